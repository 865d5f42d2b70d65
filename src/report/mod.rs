//! Result rendering for stdout.

pub mod generator;

pub use generator::*;

use crate::cli::OutputFormat;
use anyhow::Result;
use serde::Serialize;

/// Render `value` in the requested format, using `text` for plain output.
pub fn render<T, F>(format: OutputFormat, value: &T, text: F) -> Result<String>
where
    T: Serialize + ?Sized,
    F: FnOnce(&T) -> String,
{
    match format {
        OutputFormat::Json => generate_json_report(value),
        OutputFormat::Text => Ok(text(value)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Group;

    #[test]
    fn test_render_switches_on_format() {
        let groups = vec![Group {
            email: "eng@example.com".to_string(),
            name: "Engineering".to_string(),
            ..Group::default()
        }];

        let text = render(OutputFormat::Text, groups.as_slice(), generate_groups).unwrap();
        assert_eq!(text, "Engineering - eng@example.com\n");

        let json = render(OutputFormat::Json, groups.as_slice(), generate_groups).unwrap();
        assert!(json.contains("\"email\": \"eng@example.com\""));
    }
}
