use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Monolithic-flat descriptor pointing at the raw image as a single extent.
pub const DEFAULT_TEMPLATE: &str = include_str!("../templates/vmdk.tpl");

/// Descriptor template with `[key]` placeholders.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Template {
    text: String,
}

impl Default for Template {
    fn default() -> Self {
        Self::new(DEFAULT_TEMPLATE)
    }
}

impl Template {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn load(path: &Path) -> crate::Result<Self> {
        Ok(Self::new(fs::read_to_string(path)?))
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replace every `[key]` found in `values` with its value.
    ///
    /// Values are inserted literally and never scanned again. Bracketed text
    /// whose key is not in `values` is kept as is.
    pub fn render(&self, values: &BTreeMap<String, String>) -> String {
        let mut out = String::with_capacity(self.text.len());
        let mut rest = self.text.as_str();
        while let Some(open) = rest.find('[') {
            out.push_str(&rest[..open]);
            let after = &rest[open + 1..];
            match after.find(|c: char| c == '[' || c == ']') {
                Some(close) if after.as_bytes()[close] == b']' => {
                    let key = &after[..close];
                    match values.get(key) {
                        Some(value) => out.push_str(value),
                        None => {
                            out.push('[');
                            out.push_str(key);
                            out.push(']');
                        }
                    }
                    rest = &after[close + 1..];
                }
                _ => {
                    out.push('[');
                    rest = after;
                }
            }
        }
        out.push_str(rest);
        out
    }

    pub fn write(&self, values: &BTreeMap<String, String>, path: &Path) -> crate::Result<()> {
        fs::write(path, self.render(values))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn substitutes_known_keys() {
        let tpl = Template::new("RW [numOfSectors] FLAT \"[imgLocation]\" 0\n[numOfSectors]");
        let out = tpl.render(&values(&[
            ("numOfSectors", "2048"),
            ("imgLocation", "disk.raw"),
        ]));
        assert_eq!(out, "RW 2048 FLAT \"disk.raw\" 0\n2048");
    }

    #[test]
    fn keeps_unknown_and_unbalanced_brackets() {
        let tpl = Template::new("[a] [unknown] [ [[a]] a]");
        let out = tpl.render(&values(&[("a", "1")]));
        assert_eq!(out, "1 [unknown] [ [1] a]");
        assert_eq!(Template::new("tail [a").render(&values(&[("a", "1")])), "tail [a");
    }

    #[test]
    fn values_are_literal() {
        let tpl = Template::new("[path] [b]");
        let out = tpl.render(&values(&[("path", "C:\\img$1[b]"), ("b", "x")]));
        assert_eq!(out, "C:\\img$1[b] x");
    }

    #[test]
    fn default_template_has_every_descriptor_key() {
        let tpl = Template::default();
        for key in [
            "diskType",
            "numOfSectors",
            "numOfCylinders",
            "headsPerTrack",
            "sectorsPerTrack",
            "imgLocation",
        ] {
            assert!(tpl.text().contains(&format!("[{key}]")), "{key}");
        }
    }

    #[test]
    fn write_and_load_files() {
        let dir = std::env::temp_dir().join(format!("vmdk-template-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let tpl_path = dir.join("custom.tpl");
        let out_path = dir.join("out.vmdk");
        fs::write(&tpl_path, "adapter=[diskType]\n").unwrap();

        let tpl = Template::load(&tpl_path).unwrap();
        tpl.write(&values(&[("diskType", "buslogic")]), &out_path)
            .unwrap();
        assert_eq!(fs::read_to_string(&out_path).unwrap(), "adapter=buslogic\n");

        fs::remove_dir_all(&dir).unwrap();
        assert!(matches!(
            Template::load(&tpl_path),
            Err(crate::VmdkError::Io(_))
        ));
    }
}
