//! Template storage: JSON loading, the built-in set, and rotation expansion.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::TemplateError;
use crate::types::{DesignLabel, Pos};

use super::template::RoomTemplate;

const BUILTIN_TEMPLATES_JSON: &str = include_str!("../../assets/room_templates.json");

#[derive(Deserialize)]
struct TemplateFile {
    templates: Vec<TemplateRecord>,
}

#[derive(Deserialize)]
struct TemplateRecord {
    #[serde(default)]
    design: DesignLabel,
    anchor: AnchorRecord,
    layout: Vec<String>,
}

#[derive(Deserialize)]
struct AnchorRecord {
    x: i32,
    y: i32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TemplateLibrary {
    templates: Vec<RoomTemplate>,
}

impl TemplateLibrary {
    pub fn new(templates: Vec<RoomTemplate>) -> Result<Self, TemplateError> {
        if templates.is_empty() {
            return Err(TemplateError::EmptyLibrary);
        }
        Ok(Self { templates })
    }

    pub fn builtin() -> Result<Self, TemplateError> {
        Self::from_json_str(BUILTIN_TEMPLATES_JSON)
    }

    pub fn from_json_str(json: &str) -> Result<Self, TemplateError> {
        let file: TemplateFile = serde_json::from_str(json)?;
        let templates = file
            .templates
            .iter()
            .enumerate()
            .map(|(index, record)| {
                RoomTemplate::parse_indexed(
                    index,
                    &record.layout,
                    record.design,
                    Pos { y: record.anchor.y, x: record.anchor.x },
                )
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(templates)
    }

    pub fn load(path: &Path) -> Result<Self, TemplateError> {
        let json = fs::read_to_string(path)
            .map_err(|source| TemplateError::Io { path: path.to_path_buf(), source })?;
        Self::from_json_str(&json)
    }

    pub fn templates(&self) -> &[RoomTemplate] {
        &self.templates
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Every template in all four orientations, in library order.
    pub fn variants(&self) -> Vec<RoomTemplate> {
        self.templates.iter().flat_map(RoomTemplate::all_rotations).collect()
    }
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn builtin_library_parses_and_every_template_has_doors() {
        let library = TemplateLibrary::builtin().unwrap();
        assert_eq!(library.len(), 5);
        assert!(library.templates().iter().all(|template| !template.doors().is_empty()));
        assert_eq!(library.variants().len(), 20);
    }

    #[test]
    fn load_reads_design_and_anchor_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("templates.json");
        fs::write(
            &path,
            r#"{ "templates": [
                { "design": "ice", "anchor": { "x": 1, "y": 0 }, "layout": ["WDW", "WFW"] }
            ] }"#,
        )
        .unwrap();

        let library = TemplateLibrary::load(&path).unwrap();
        let template = &library.templates()[0];
        assert_eq!(template.design(), DesignLabel::Ice);
        assert_eq!(template.anchor(), Pos { y: 0, x: 1 });
        assert_eq!(template.doors(), &[Pos { y: 0, x: 1 }]);
    }

    #[test]
    fn errors_carry_the_template_index() {
        let error = TemplateLibrary::from_json_str(
            r#"{ "templates": [
                { "anchor": { "x": 0, "y": 0 }, "layout": ["WDW"] },
                { "anchor": { "x": 0, "y": 0 }, "layout": ["WQW"] }
            ] }"#,
        )
        .unwrap_err();
        assert!(matches!(error, TemplateError::UnknownCell { index: 1, found: 'Q' }));
    }

    #[test]
    fn empty_library_is_rejected() {
        assert!(matches!(
            TemplateLibrary::from_json_str(r#"{ "templates": [] }"#),
            Err(TemplateError::EmptyLibrary)
        ));
    }

    #[test]
    fn missing_file_reports_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("absent.json");
        assert!(matches!(TemplateLibrary::load(&path), Err(TemplateError::Io { .. })));
    }
}
