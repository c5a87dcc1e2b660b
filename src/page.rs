use axum::response::Html;

pub async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

const INDEX_HTML: &str = r#"
<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Virtual Try-On</title>
    <style>
        * {
            margin: 0;
            padding: 0;
            box-sizing: border-box;
        }

        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, Oxygen, Ubuntu, Cantarell, sans-serif;
            background: linear-gradient(135deg, #667eea 0%, #764ba2 100%);
            min-height: 100vh;
            display: flex;
            align-items: center;
            justify-content: center;
            padding: 20px;
        }

        .container {
            background: white;
            border-radius: 20px;
            box-shadow: 0 20px 60px rgba(0,0,0,0.3);
            max-width: 960px;
            width: 100%;
            padding: 40px;
        }

        h1 {
            color: #333;
            margin-bottom: 10px;
            font-size: 2em;
        }

        .subtitle {
            color: #666;
            margin-bottom: 30px;
            font-size: 0.9em;
        }

        .inputs {
            display: grid;
            grid-template-columns: 1fr 1fr;
            gap: 20px;
        }

        .upload-area {
            border: 3px dashed #667eea;
            border-radius: 15px;
            padding: 30px 20px;
            text-align: center;
            cursor: pointer;
            background: #f8f9ff;
            min-height: 240px;
            display: flex;
            flex-direction: column;
            align-items: center;
            justify-content: center;
        }

        .upload-area.invalid {
            border-color: #c33;
        }

        .upload-text {
            color: #667eea;
            font-size: 1.1em;
            font-weight: 600;
            margin-bottom: 10px;
        }

        .upload-hint {
            color: #999;
            font-size: 0.85em;
        }

        .field-error {
            color: #c33;
            font-size: 0.85em;
            margin-top: 8px;
            min-height: 1em;
        }

        .preview {
            max-width: 100%;
            max-height: 200px;
            border-radius: 10px;
            display: none;
        }

        input[type="file"] {
            display: none;
        }

        .actions {
            display: flex;
            gap: 10px;
            margin-top: 25px;
        }

        button {
            border: none;
            border-radius: 10px;
            padding: 12px 24px;
            font-size: 1em;
            font-weight: 600;
            cursor: pointer;
            background: #667eea;
            color: white;
        }

        button:disabled {
            background: #bbb;
            cursor: not-allowed;
        }

        button.secondary {
            background: white;
            color: #667eea;
            border: 2px solid #667eea;
        }

        .loading {
            text-align: center;
            padding: 40px;
            display: none;
        }

        .spinner {
            border: 4px solid #f3f3f3;
            border-top: 4px solid #667eea;
            border-radius: 50%;
            width: 50px;
            height: 50px;
            animation: spin 1s linear infinite;
            margin: 0 auto 20px;
        }

        @keyframes spin {
            0% { transform: rotate(0deg); }
            100% { transform: rotate(360deg); }
        }

        .result {
            margin-top: 30px;
            display: none;
            text-align: center;
        }

        .result img {
            max-width: 100%;
            border-radius: 10px;
            box-shadow: 0 4px 15px rgba(0,0,0,0.1);
        }

        .error {
            background: #fee;
            border: 2px solid #fcc;
            color: #c33;
            padding: 15px;
            border-radius: 10px;
            margin-top: 20px;
            display: none;
        }
    </style>
</head>
<body>
    <div class="container">
        <h1>👕 Virtual Try-On</h1>
        <p class="subtitle">Upload a photo of yourself and a clothing item</p>

        <form id="tryonForm">
            <div class="inputs">
                <div>
                    <label class="upload-area" id="userImageArea" for="userImage">
                        <img class="preview" id="userImagePreview" alt="Your photo">
                        <div class="upload-text" id="userImageText">Your photo</div>
                        <div class="upload-hint">JPG, PNG, WebP • Max 10MB</div>
                    </label>
                    <input type="file" id="userImage" name="userImage" accept="image/jpeg,image/png,image/webp">
                    <div class="field-error" id="userImageError"></div>
                </div>
                <div>
                    <label class="upload-area" id="clothingImageArea" for="clothingImage">
                        <img class="preview" id="clothingImagePreview" alt="Clothing item">
                        <div class="upload-text" id="clothingImageText">Clothing item</div>
                        <div class="upload-hint">JPG, PNG, WebP • Max 10MB</div>
                    </label>
                    <input type="file" id="clothingImage" name="clothingImage" accept="image/jpeg,image/png,image/webp">
                    <div class="field-error" id="clothingImageError"></div>
                </div>
            </div>

            <div class="actions">
                <button type="submit" id="submitButton" disabled>Try it on</button>
                <button type="button" class="secondary" id="resetButton">Reset</button>
            </div>
        </form>

        <div class="loading" id="loading">
            <div class="spinner"></div>
            <p>Generating your try-on...</p>
        </div>

        <div class="error" id="error"></div>

        <div class="result" id="result">
            <img id="resultImage" alt="Try-on result">
        </div>
    </div>

    <script>
        const MAX_FILE_SIZE = 10 * 1024 * 1024;
        const ALLOWED_TYPES = ['image/jpeg', 'image/png', 'image/webp'];
        const FIELDS = ['userImage', 'clothingImage'];

        const form = document.getElementById('tryonForm');
        const submitButton = document.getElementById('submitButton');
        const resetButton = document.getElementById('resetButton');
        const loading = document.getElementById('loading');
        const errorDiv = document.getElementById('error');
        const result = document.getElementById('result');
        const resultImage = document.getElementById('resultImage');

        const files = { userImage: null, clothingImage: null };

        function validateFile(file) {
            if (!(file instanceof File)) return 'Please select a file';
            if (file.size > MAX_FILE_SIZE) return 'File size must be less than 10MB';
            if (!ALLOWED_TYPES.includes(file.type)) return 'Only JPEG, PNG and WebP images are allowed';
            return null;
        }

        function refreshSubmit() {
            submitButton.disabled = !FIELDS.every((name) => validateFile(files[name]) === null);
        }

        function showPreview(name, file) {
            const preview = document.getElementById(name + 'Preview');
            const text = document.getElementById(name + 'Text');
            if (!file) {
                preview.style.display = 'none';
                preview.removeAttribute('src');
                text.style.display = 'block';
                return;
            }
            const reader = new FileReader();
            reader.onload = (e) => {
                preview.src = e.target.result;
                preview.style.display = 'block';
                text.style.display = 'none';
            };
            reader.readAsDataURL(file);
        }

        FIELDS.forEach((name) => {
            document.getElementById(name).addEventListener('change', (e) => {
                const file = e.target.files[0] || null;
                const message = validateFile(file);
                files[name] = file;
                document.getElementById(name + 'Error').textContent = message || '';
                document.getElementById(name + 'Area').classList.toggle('invalid', message !== null);
                showPreview(name, message === null ? file : null);
                refreshSubmit();
            });
        });

        async function getImage(formData) {
            const response = await fetch('/api/tryon', {
                method: 'POST',
                body: formData
            });

            let body = {};
            try {
                body = await response.json();
            } catch (_) {}

            if (!response.ok) {
                throw new Error(body.error || `API Error: ${response.statusText}`);
            }
            if (!body.image) {
                throw new Error('API did not return a generated image URL.');
            }
            return body.image;
        }

        form.addEventListener('submit', async (e) => {
            e.preventDefault();
            if (submitButton.disabled) return;

            const formData = new FormData();
            FIELDS.forEach((name) => formData.append(name, files[name]));

            loading.style.display = 'block';
            errorDiv.style.display = 'none';
            result.style.display = 'none';
            submitButton.disabled = true;

            try {
                resultImage.src = await getImage(formData);
                result.style.display = 'block';
            } catch (error) {
                errorDiv.textContent = 'Error: ' + error.message;
                errorDiv.style.display = 'block';
            } finally {
                loading.style.display = 'none';
                refreshSubmit();
            }
        });

        resetButton.addEventListener('click', () => {
            form.reset();
            FIELDS.forEach((name) => {
                files[name] = null;
                document.getElementById(name + 'Error').textContent = '';
                document.getElementById(name + 'Area').classList.remove('invalid');
                showPreview(name, null);
            });
            result.style.display = 'none';
            resultImage.removeAttribute('src');
            errorDiv.style.display = 'none';
            refreshSubmit();
        });
    </script>
</body>
</html>
"#;
