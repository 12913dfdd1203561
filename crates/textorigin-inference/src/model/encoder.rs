#[derive(Debug, thiserror::Error)]
pub enum EncoderError {
    #[error("failed to decode label encoder artifact")]
    Decode(#[from] bincode::error::DecodeError),
    #[error("failed to encode label encoder artifact")]
    Encode(#[from] bincode::error::EncodeError),
    #[error("label encoder has no classes")]
    Empty,
    #[error("label encoder lists class {0:?} twice")]
    Duplicate(String),
}

/// The fitted class-name table: class index -> name, in training order.
/// Probability vectors from the classifier are indexed by the same order.
#[derive(Debug, Clone, PartialEq, Eq, bincode::Encode, bincode::Decode)]
pub struct LabelEncoder {
    classes: Vec<String>,
}

impl LabelEncoder {
    pub fn new(classes: Vec<String>) -> Result<Self, EncoderError> {
        if classes.is_empty() {
            return Err(EncoderError::Empty);
        }
        for (idx, class) in classes.iter().enumerate() {
            if classes[..idx].contains(class) {
                return Err(EncoderError::Duplicate(class.clone()));
            }
        }
        Ok(Self { classes })
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn n_classes(&self) -> usize {
        self.classes.len()
    }

    pub fn decode(&self, class_idx: usize) -> Option<&str> {
        self.classes.get(class_idx).map(String::as_str)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, EncoderError> {
        let (decoded, _): (Self, usize) =
            bincode::decode_from_slice(bytes, bincode::config::standard())?;
        Self::new(decoded.classes)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, EncoderError> {
        Ok(bincode::encode_to_vec(self, bincode::config::standard())?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classes(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn decodes_by_training_order() {
        let encoder = LabelEncoder::new(classes(&["AI", "Human", "LLM-Rewritten"])).unwrap();
        assert_eq!(encoder.n_classes(), 3);
        assert_eq!(encoder.decode(0), Some("AI"));
        assert_eq!(encoder.decode(2), Some("LLM-Rewritten"));
        assert_eq!(encoder.decode(3), None);
    }

    #[test]
    fn duplicate_classes_are_rejected() {
        assert!(matches!(
            LabelEncoder::new(classes(&["Human", "Human"])),
            Err(EncoderError::Duplicate(_))
        ));
    }

    #[test]
    fn empty_table_is_rejected() {
        assert!(matches!(
            LabelEncoder::new(Vec::new()),
            Err(EncoderError::Empty)
        ));
    }

    #[test]
    fn bytes_round_trip() {
        let encoder = LabelEncoder::new(classes(&["AI", "Human"])).unwrap();
        let decoded = LabelEncoder::from_bytes(&encoder.to_bytes().unwrap()).unwrap();
        assert_eq!(decoded, encoder);
    }
}
