use handlebars::Handlebars;

use std::fs::File;
use std::io::Write;
use std::path::Path;

pub fn write_string_to_file(path: &Path, content: &str) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(content.as_bytes())?;
    Ok(())
}

pub fn get_handlebars() -> Handlebars<'static> {
    let mut handlebars = Handlebars::new();
    handlebars.set_strict_mode(true);
    handlebars
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn handlebars_can_render() {
        let handlebars = get_handlebars();
        let res = handlebars
            .render_template("Hello {{name}}", &json!({"name": "foo"}))
            .expect("This to render");
        assert_eq!(res, "Hello foo");
    }

    #[test]
    fn handlebars_triple_stash_does_not_escape() {
        let handlebars = get_handlebars();
        let res = handlebars
            .render_template("var x = {{{data}}};", &json!({"data": "[\"a>b\"]"}))
            .expect("This to render");
        assert_eq!(res, r#"var x = ["a>b"];"#);
    }

    #[test]
    fn handlebars_strict_mode_rejects_missing_fields() {
        let handlebars = get_handlebars();
        assert!(handlebars
            .render_template("{{missing}}", &json!({}))
            .is_err());
    }

    #[test]
    fn write_string_to_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");
        write_string_to_file(&path, "content").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "content");
    }
}
