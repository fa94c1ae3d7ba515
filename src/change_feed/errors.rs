use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum ChangeDecodeError {
    #[error("Change row is missing column `{0}`")]
    MissingColumn(&'static str),

    #[error("Order {order_id} has malformed items: {source}")]
    MalformedItems {
        order_id: Uuid,
        #[source]
        source: serde_json::Error,
    },
}
