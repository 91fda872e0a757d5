use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConvError {
    /// 牌番号・鳴きコードが値域外
    #[error("cannot decode {what} from raw value {value}")]
    Decode { what: &'static str, value: String },
    /// 局面の不整合（手牌にない牌の除去、局外のイベント等）
    #[error("invalid state: {message}")]
    InvalidState { message: String },
    /// 必須属性の欠落・不正な値
    #[error("malformed <{tag}> event: `{field}` {message}")]
    ProtocolShape {
        tag: String,
        field: String,
        message: String,
    },
    /// シリアライズの失敗
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ConvError {
    pub fn decode(what: &'static str, value: impl ToString) -> Self {
        ConvError::Decode {
            what,
            value: value.to_string(),
        }
    }

    pub fn invalid_state(message: impl Into<String>) -> Self {
        ConvError::InvalidState {
            message: message.into(),
        }
    }

    pub fn shape(tag: &str, field: &str, message: impl Into<String>) -> Self {
        ConvError::ProtocolShape {
            tag: tag.to_string(),
            field: field.to_string(),
            message: message.into(),
        }
    }
}

pub type ConvResult<T> = Result<T, ConvError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_offending_field() {
        let err = ConvError::shape("INIT", "seed", "is missing");
        assert_eq!(err.to_string(), "malformed <INIT> event: `seed` is missing");
    }

    #[test]
    fn decode_error_reports_value() {
        let err = ConvError::decode("tile index", 136);
        assert_eq!(err.to_string(), "cannot decode tile index from raw value 136");
    }
}
