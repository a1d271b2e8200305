//! Shallow routing through the URL fragment
//!
//! The fragment is treated as a query string (`#scene=math-garden&lang=en`).
//! Only the `scene` parameter is owned by the player; anything else in the
//! fragment is carried along untouched.

use url::form_urlencoded;

/// Fragment parameter holding the active scene id
pub const SCENE_PARAM: &str = "scene";

/// Read a parameter from a fragment (leading `#` optional)
pub fn get_param(fragment: &str, key: &str) -> Option<String> {
    form_urlencoded::parse(fragment.trim_start_matches('#').as_bytes())
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.into_owned())
}

/// Return `fragment` with `key` set to `value`.
///
/// An existing parameter keeps its position; a new one is appended.
/// Duplicate occurrences of `key` collapse into one.
pub fn with_param(fragment: &str, key: &str, value: &str) -> String {
    let mut replaced = false;
    let mut serializer = form_urlencoded::Serializer::new(String::new());

    for (k, v) in form_urlencoded::parse(fragment.trim_start_matches('#').as_bytes()) {
        if k == key {
            if !replaced {
                serializer.append_pair(key, value);
                replaced = true;
            }
        } else {
            serializer.append_pair(&k, &v);
        }
    }

    if !replaced {
        serializer.append_pair(key, value);
    }

    serializer.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_param() {
        assert_eq!(
            get_param("#scene=math-garden", SCENE_PARAM).as_deref(),
            Some("math-garden")
        );
        assert_eq!(
            get_param("lang=en&scene=nature-path", SCENE_PARAM).as_deref(),
            Some("nature-path")
        );
        assert_eq!(get_param("", SCENE_PARAM), None);
        assert_eq!(get_param("lang=en", SCENE_PARAM), None);
    }

    #[test]
    fn test_with_param_appends() {
        assert_eq!(with_param("", SCENE_PARAM, "science-corner"), "scene=science-corner");
        assert_eq!(
            with_param("#lang=en", SCENE_PARAM, "science-corner"),
            "lang=en&scene=science-corner"
        );
    }

    #[test]
    fn test_with_param_replaces_in_place() {
        assert_eq!(
            with_param("scene=math-garden&lang=en", SCENE_PARAM, "nature-path"),
            "scene=nature-path&lang=en"
        );
        assert_eq!(
            with_param("scene=a&scene=b", SCENE_PARAM, "math-garden"),
            "scene=math-garden"
        );
    }
}
