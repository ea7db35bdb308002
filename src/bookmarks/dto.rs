use serde::Deserialize;

/// Payload for create and update. Update is a full replace: all three
/// fields are taken as given, nothing is merged from the prior row.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookmarkPayload {
    #[serde(default)]
    pub title: String,
    pub description: Option<String>,
    #[serde(default)]
    pub link: String,
}
