use super::model::Profile;

/// Renders the one-line profile summary shown in listings and logs.
pub fn describe_profile(profile: &Profile, username: &str) -> String {
    format!(
        "(Username: {}, Location: {}, Age: {}, Camera Type: {}, Job: {}, Social Status: {}, Style: {}, URL: {})",
        username,
        profile.location,
        profile.age,
        profile.camera_type,
        profile.job,
        profile.social_status,
        profile.photography_style,
        profile.url,
    )
}
