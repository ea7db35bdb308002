use serde::Deserialize;

/// Full replacement of the caller's profile fields; the target id always
/// comes from the verified token, never from the body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    #[serde(default)]
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}
