use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::services::Credential;

/// Body of `POST .../claim/authorize-claim`. At most one credential is used;
/// `otp` wins when both are sent.
#[derive(Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizeClaimRequest {
    #[validate(length(min = 1, max = 64))]
    #[schema(example = "PB-001")]
    pub passbook_number: String,

    #[validate(length(max = 64))]
    #[schema(example = "482913")]
    pub otp: Option<String>,

    /// `YYYY-MM-DD`, `MM/DD/YYYY` or an RFC 3339 timestamp.
    #[validate(length(max = 64))]
    #[schema(example = "1990-05-15")]
    pub birthday: Option<String>,
}

impl AuthorizeClaimRequest {
    pub fn into_parts(self) -> (String, Option<Credential>) {
        let credential = Credential::from_parts(self.otp, self.birthday);
        (self.passbook_number, credential)
    }
}
