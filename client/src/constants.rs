// Fixed protocol literals.
pub const ALGORITHM_NAME: &str = "HmacSHA256";
pub const SECRET_KEY_PREFIX: &str = "DHPWS";

// Headers used by the platform.
//
// `SignedDate` is stored lowercase like every other header but must be
// rendered with its canonical spelling when signed.
pub const SIGNED_DATE: &str = "SignedDate";
pub const SIGNED_DATE_LOWER: &str = "signeddate";
pub const ACCESS_TOKEN: &str = "accesstoken";

// Env values used by Config.
pub const DHP_API_BASE_URL: &str = "DHP_API_BASE_URL";
pub const DHP_APPLICATION_NAME: &str = "DHP_APPLICATION_NAME";
pub const DHP_SIGNING_KEY: &str = "DHP_SIGNING_KEY";
pub const DHP_SIGNING_SECRET: &str = "DHP_SIGNING_SECRET";
