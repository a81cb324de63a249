use crate::dataurl;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Prompt sent with every try-on call.
pub const TRYON_PROMPT: &str = "Virtual try-on from TryMe";
/// Denoising steps for the diffusion pass.
pub const DENOISING_STEPS: u32 = 30;
/// Fixed seed so repeated calls with the same inputs are comparable.
pub const SEED: u32 = 42;

/// Response envelope of a Space prediction. `data` is a sequence of
/// polymorphic image references; its elements are kept as raw JSON and
/// handed to the normalizer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictEnvelope {
    #[serde(default)]
    pub data: Vec<Value>,
}

impl PredictEnvelope {
    /// The primary output image, or null when the Space returned nothing.
    pub fn output_image(&self) -> Value {
        self.data.first().cloned().unwrap_or(Value::Null)
    }

    /// The secondary masked image, or null.
    pub fn masked_image(&self) -> Value {
        self.data.get(1).cloned().unwrap_or(Value::Null)
    }
}

/// Builds the ordered parameter tuple the `tryon` endpoint expects. All
/// non-image fields are constants; the images travel as data URLs.
pub fn tryon_payload(human: &[u8], garment: &[u8]) -> Value {
    json!({
        "data": [
            {
                "background": dataurl::encode("image/png", human),
                "layers": [],
                "composite": null,
            },
            dataurl::encode("image/png", garment),
            TRYON_PROMPT,
            true,   // auto mask
            false,  // auto crop
            DENOISING_STEPS,
            SEED,
        ]
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn payload_carries_the_fixed_parameter_tuple() {
        let payload = tryon_payload(b"human", b"garment");
        let data = payload["data"].as_array().unwrap();

        assert_eq!(data.len(), 7);
        assert!(
            data[0]["background"]
                .as_str()
                .unwrap()
                .starts_with("data:image/png;base64,")
        );
        assert_eq!(data[0]["layers"], json!([]));
        assert_eq!(data[0]["composite"], Value::Null);
        assert!(data[1].as_str().unwrap().starts_with("data:image/png;base64,"));
        assert_eq!(data[2], json!(TRYON_PROMPT));
        assert_eq!(data[3], json!(true));
        assert_eq!(data[4], json!(false));
        assert_eq!(data[5], json!(30));
        assert_eq!(data[6], json!(42));
    }

    #[test]
    fn envelope_tolerates_short_or_missing_data() {
        let empty: PredictEnvelope = serde_json::from_str("{}").unwrap();
        assert_eq!(empty.output_image(), Value::Null);
        assert_eq!(empty.masked_image(), Value::Null);

        let single: PredictEnvelope =
            serde_json::from_value(json!({"data": ["out.png"]})).unwrap();
        assert_eq!(single.output_image(), json!("out.png"));
        assert_eq!(single.masked_image(), Value::Null);
    }
}
