use crate::datasets::{FeatureSchema, Variant};

const STYLE: &str = r#"
body { font-family: sans-serif; max-width: 960px; margin: 2rem auto; color: #2c3e50; }
form { display: grid; grid-template-columns: repeat(auto-fill, minmax(220px, 1fr)); gap: 0.75rem; }
label { display: flex; flex-direction: column; font-size: 0.9rem; }
input { padding: 0.35rem; margin-top: 0.2rem; }
input.invalid { border: 2px solid #e74c3c; }
.actions { grid-column: 1 / -1; display: flex; gap: 1rem; }
#result { margin-top: 1.5rem; padding: 1rem; border-radius: 6px; display: none; }
#result.malignant { background: #fdecea; }
#result.benign { background: #eafaf1; }
#result.error { background: #fff4e5; }
"#;

const SCRIPT: &str = r#"
const form = document.getElementById('predictionForm');
const result = document.getElementById('result');

document.getElementById('sampleValues').addEventListener('click', () => {
    const sample = SAMPLES[Math.floor(Math.random() * SAMPLES.length)];
    for (const [name, value] of Object.entries(sample)) {
        const input = form.elements[name];
        if (input) { input.value = value; input.classList.remove('invalid'); }
    }
});

form.addEventListener('submit', async (e) => {
    e.preventDefault();
    const body = new URLSearchParams(new FormData(form));
    result.style.display = 'block';
    try {
        const response = await fetch('/predict', {
            method: 'POST',
            headers: { 'Content-Type': 'application/x-www-form-urlencoded' },
            body,
        });
        const data = await response.json();
        if (!response.ok) {
            (data.missing_fields || []).concat(data.invalid_field || [])
                .forEach((name) => form.elements[name] && form.elements[name].classList.add('invalid'));
            throw new Error(data.error || 'Prediction request failed');
        }
        const malignant = data.result.startsWith('Malignant');
        result.className = malignant ? 'malignant' : 'benign';
        let html = `<h3>Diagnosis: ${data.result}</h3>`;
        if (data.probability !== undefined) {
            html += `<p>Malignancy Probability: ${(data.probability * 100).toFixed(2)}%</p>`;
            html += `<p>Confidence: ${data.confidence}</p>`;
        }
        result.innerHTML = html;
    } catch (err) {
        result.className = 'error';
        result.innerHTML = `<h3>Error</h3><p>${err.message}</p>`;
    }
});
"#;

fn title(variant: Variant) -> &'static str {
    match variant {
        Variant::Clump => "Breast Cancer Prediction (Cell Characteristics)",
        Variant::Wdbc => "Breast Cancer Diagnosis (Wisconsin Diagnostic Features)",
    }
}

fn samples_json(schema: &FeatureSchema) -> String {
    let objects: Vec<String> = schema
        .samples
        .iter()
        .map(|sample| {
            let pairs: Vec<String> = schema
                .fields
                .iter()
                .zip(sample.iter())
                .map(|(name, value)| format!("\"{name}\": {value}"))
                .collect();
            format!("{{{}}}", pairs.join(", "))
        })
        .collect();
    format!("[{}]", objects.join(", "))
}

/// Renders the input form for `variant`: one numeric input per schema field,
/// posted to `/predict`.
pub fn render_index(variant: Variant) -> String {
    let schema = variant.schema();
    let inputs: String = schema
        .fields
        .iter()
        .zip(schema.captions)
        .map(|(name, caption)| {
            format!(
                "    <label for=\"{name}\">{caption}\n      <input type=\"number\" step=\"any\" min=\"0\" id=\"{name}\" name=\"{name}\" required>\n    </label>\n"
            )
        })
        .collect();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>{title}</title>
  <style>{STYLE}</style>
</head>
<body>
  <h1>{title}</h1>
  <form id="predictionForm" method="post" action="/predict">
{inputs}    <div class="actions">
      <button type="button" id="sampleValues">Load sample values</button>
      <button type="submit">Predict</button>
    </div>
  </form>
  <div id="result"></div>
  <script>const SAMPLES = {samples};</script>
  <script>{SCRIPT}</script>
</body>
</html>
"#,
        title = title(variant),
        samples = samples_json(schema),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_has_one_input_per_field() {
        for variant in [Variant::Clump, Variant::Wdbc] {
            let html = render_index(variant);
            let schema = variant.schema();
            assert_eq!(html.matches("<input ").count(), schema.len());
            for field in schema.fields {
                assert!(html.contains(&format!("name=\"{field}\"")));
            }
        }
    }

    #[test]
    fn test_index_posts_to_predict() {
        let html = render_index(Variant::Clump);
        assert!(html.contains("action=\"/predict\""));
        assert!(html.contains("\"clump_thickness\": 8"));
    }

    #[test]
    fn test_index_offers_every_sample_profile() {
        let html = render_index(Variant::Wdbc);
        assert!(html.contains("const SAMPLES = [{"));
        assert_eq!(html.matches("\"radius_mean\": ").count(), 3);
        assert!(html.contains("\"radius_mean\": 17.99"));
        assert!(html.contains("\"radius_mean\": 11"));
    }
}
