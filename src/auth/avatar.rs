use crate::auth::repo::Gender;

// https://avatar-placeholder.iran.liara.run/
const BOY_TEMPLATE: &str = "https://avatar.iran.liara.run/public/boy";
const GIRL_TEMPLATE: &str = "https://avatar.iran.liara.run/public/girl";

/// Derive the profile picture URL from username and gender. Computed once at
/// registration and stored on the user record, never recomputed.
pub fn profile_pic_url(username: &str, gender: Gender) -> String {
    let template = match gender {
        Gender::Male => BOY_TEMPLATE,
        _ => GIRL_TEMPLATE,
    };
    format!("{template}?username={username}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn male_gets_the_boy_template() {
        let url = profile_pic_url("alice", Gender::Male);
        assert_eq!(url, "https://avatar.iran.liara.run/public/boy?username=alice");
    }

    #[test]
    fn female_gets_the_girl_template() {
        let url = profile_pic_url("alice", Gender::Female);
        assert!(url.contains("girl"));
        assert!(url.ends_with("username=alice"));
    }
}
