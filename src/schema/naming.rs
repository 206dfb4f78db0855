/// Converts a `CamelCase` type name to `snake_case`.
///
/// An underscore is inserted at every lowercase → uppercase transition and
/// before the last letter of an acronym that starts a new word, so
/// `HTTPServerV1` becomes `http_server_v1`. Digits never start a word, which
/// means `S3ConfigV0` becomes `s3config_v0`.
pub fn camel_to_snake(name: &str) -> String {
    let chars = name.chars().collect::<Vec<_>>();

    if chars.len() < 2 {
        return name.to_lowercase();
    }

    let mut out = String::with_capacity(name.len() + 4);
    out.extend(chars[0].to_lowercase());

    for win in chars.windows(3) {
        let (c0, c1, c2) = (win[0], win[1], win[2]);

        if c0.is_lowercase() && c1.is_uppercase() {
            out.push('_');
        }

        if c0.is_uppercase() && c1.is_uppercase() && c2.is_lowercase() {
            out.push('_');
        }

        out.extend(c1.to_lowercase());
    }

    out.extend(chars[chars.len() - 1].to_lowercase());
    out
}

/// Splits the `V<digits>` version suffix off of a type name, returning the
/// lowercase version directory name, eg. `FooV12` -> `v12`
pub fn version_of_type(type_name: &str) -> Option<String> {
    let digits = type_name
        .bytes()
        .rev()
        .take_while(u8::is_ascii_digit)
        .count();

    if digits == 0 {
        return None;
    }

    let (head, num) = type_name.split_at(type_name.len() - digits);
    head.ends_with('V').then(|| format!("v{num}"))
}

/// The Go type name for a schema with the given title in the given version
/// directory, eg. `Foo` + `v1` -> `FooV1`
#[inline]
pub fn struct_name(title: &str, version: &str) -> String {
    format!("{title}{}", version.to_uppercase())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn snake_cases() {
        let cases = [
            ("FooV1", "foo_v1"),
            ("ExperimentConfigV0", "experiment_config_v0"),
            ("HTTPServerV1", "http_server_v1"),
            ("S3ConfigV0", "s3config_v0"),
            ("GCSConfigV0", "gcs_config_v0"),
            ("KubernetesPodSpecV0", "kubernetes_pod_spec_v0"),
            ("AB", "ab"),
            ("A", "a"),
            ("", ""),
        ];

        for (input, expected) in cases {
            assert_eq!(camel_to_snake(input), expected, "{input}");
        }
    }

    #[test]
    fn version_suffixes() {
        assert_eq!(version_of_type("FooV1").as_deref(), Some("v1"));
        assert_eq!(version_of_type("FooV12").as_deref(), Some("v12"));
        assert_eq!(version_of_type("V3").as_deref(), Some("v3"));
        assert_eq!(version_of_type("Foo"), None);
        assert_eq!(version_of_type("Foo1"), None);
        assert_eq!(version_of_type("FooV"), None);
        assert_eq!(version_of_type("FooV1Bar"), None);
        assert_eq!(version_of_type("Foov1"), None);
    }

    #[test]
    fn names_round_trip() {
        let name = struct_name("Foo", "v3");
        assert_eq!(name, "FooV3");
        assert_eq!(version_of_type(&name).as_deref(), Some("v3"));
    }
}
