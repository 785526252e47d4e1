//! Exercise catalog entity: validation and accessors.

use crate::error::ValidationError;
use crate::types::{Difficulty, Exercise, ExerciseDocument, Image, ImageDocument, ReferenceDocument};

/// Validate a raw exercise document.
///
/// Only `name` is required. `isActive` defaults to `true` and is stored
/// explicitly. Validation stops at the first violation.
pub fn validate_exercise(doc: &ExerciseDocument) -> Result<Exercise, ValidationError> {
    let name = match doc.name.as_deref() {
        Some(name) if !name.trim().is_empty() => name.to_string(),
        _ => return Err(ValidationError::missing("name")),
    };

    let difficulty = match doc.difficulty.as_deref() {
        None => None,
        Some(value) => Some(
            Difficulty::from_name(value)
                .ok_or_else(|| ValidationError::wrong_enum("difficulty", value, Difficulty::NAMES))?,
        ),
    };

    let images = doc
        .images
        .iter()
        .flatten()
        .enumerate()
        .map(|(i, image)| validate_image(image, &format!("images[{}]", i)))
        .collect::<Result<Vec<_>, _>>()?;

    let image = doc
        .image
        .as_ref()
        .map(|image| validate_image(image, "image"))
        .transpose()?;

    Ok(Exercise {
        id: doc.id.clone(),
        name,
        description: doc.description.clone(),
        difficulty,
        images,
        image,
        video_url: doc.video_url.clone(),
        is_active: doc.is_active.unwrap_or(true),
    })
}

fn validate_image(doc: &ImageDocument, path: &str) -> Result<Image, ValidationError> {
    match doc.asset.as_ref().map(ReferenceDocument::target) {
        Some(asset) if !asset.is_empty() => Ok(Image {
            asset: asset.to_string(),
            alt: doc.alt.clone(),
        }),
        _ => Err(ValidationError::missing(format!("{}.asset", path))),
    }
}

impl TryFrom<&ExerciseDocument> for Exercise {
    type Error = ValidationError;

    fn try_from(doc: &ExerciseDocument) -> Result<Self, Self::Error> {
        validate_exercise(doc)
    }
}

impl Exercise {
    /// Built-in catalog entries are constructed directly; they satisfy every
    /// invariant by construction.
    pub(crate) fn seed(
        id: &str,
        name: &str,
        description: &str,
        difficulty: Difficulty,
        video_url: Option<&str>,
    ) -> Self {
        Self {
            id: Some(id.to_string()),
            name: name.to_string(),
            description: Some(description.to_string()),
            difficulty: Some(difficulty),
            images: Vec::new(),
            image: None,
            video_url: video_url.map(str::to_string),
            is_active: true,
        }
    }

    pub(crate) fn retired(mut self) -> Self {
        self.is_active = false;
        self
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn difficulty(&self) -> Option<Difficulty> {
        self.difficulty
    }

    pub fn images(&self) -> &[Image] {
        &self.images
    }

    pub fn image(&self) -> Option<&Image> {
        self.image.as_ref()
    }

    pub fn video_url(&self) -> Option<&str> {
        self.video_url.as_deref()
    }

    /// Inactive exercises are hidden from listings but still resolvable
    pub fn is_active(&self) -> bool {
        self.is_active
    }

    /// Convert back into the document shape, with defaults explicit
    pub fn to_document(&self) -> ExerciseDocument {
        ExerciseDocument {
            id: self.id.clone(),
            name: Some(self.name.clone()),
            description: self.description.clone(),
            difficulty: self.difficulty.map(|d| d.as_str().to_string()),
            images: Some(self.images.iter().map(Image::to_document).collect()),
            image: self.image.as_ref().map(Image::to_document),
            video_url: self.video_url.clone(),
            is_active: Some(self.is_active),
        }
    }
}

impl Image {
    pub fn asset(&self) -> &str {
        &self.asset
    }

    pub fn alt(&self) -> Option<&str> {
        self.alt.as_deref()
    }

    fn to_document(&self) -> ImageDocument {
        ImageDocument {
            asset: Some(ReferenceDocument::Id(self.asset.clone())),
            alt: self.alt.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationReason;

    fn parse(json: &str) -> ExerciseDocument {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_minimal_exercise_is_valid() {
        let exercise = validate_exercise(&parse(r#"{"name": "Push-up"}"#)).unwrap();

        assert_eq!(exercise.name(), "Push-up");
        assert!(exercise.difficulty().is_none());
        assert!(exercise.images().is_empty());
        assert!(exercise.is_active(), "isActive defaults to true");
    }

    #[test]
    fn test_missing_or_blank_name_is_rejected() {
        for json in [r#"{}"#, r#"{"name": ""}"#, r#"{"name": "   "}"#] {
            let err = validate_exercise(&parse(json)).unwrap_err();
            assert_eq!(err.path, "name");
            assert_eq!(err.reason, ValidationReason::MissingRequired);
        }
    }

    #[test]
    fn test_unknown_difficulty_is_rejected() {
        let err = validate_exercise(&parse(r#"{"name": "Squat", "difficulty": "expert"}"#))
            .unwrap_err();

        assert_eq!(err.path, "difficulty");
        assert!(matches!(
            err.reason,
            ValidationReason::WrongEnumValue { ref value, .. } if value == "expert"
        ));
    }

    #[test]
    fn test_full_document_keeps_media() {
        let doc = parse(
            r#"{
                "_id": "squat",
                "name": "Back Squat",
                "difficulty": "intermediate",
                "images": [
                    {"asset": {"_type": "reference", "_ref": "image-abc"}, "alt": "bottom"},
                    {"asset": "image-def"}
                ],
                "image": {"asset": "image-main", "alt": "front view"},
                "videoUrl": "https://example.com/squat",
                "isActive": false
            }"#,
        );
        let exercise = validate_exercise(&doc).unwrap();

        assert_eq!(exercise.id(), Some("squat"));
        assert_eq!(exercise.difficulty(), Some(Difficulty::Intermediate));
        assert_eq!(exercise.images().len(), 2);
        assert_eq!(exercise.images()[0].asset(), "image-abc");
        assert_eq!(exercise.images()[0].alt(), Some("bottom"));
        assert_eq!(exercise.images()[1].alt(), None);
        assert_eq!(exercise.image().unwrap().asset(), "image-main");
        assert_eq!(exercise.video_url(), Some("https://example.com/squat"));
        assert!(!exercise.is_active());
    }

    #[test]
    fn test_image_without_asset_is_rejected() {
        let err = validate_exercise(&parse(
            r#"{"name": "Row", "images": [{"asset": "a"}, {"alt": "no asset"}]}"#,
        ))
        .unwrap_err();
        assert_eq!(err.path, "images[1].asset");

        let err = validate_exercise(&parse(r#"{"name": "Row", "image": {"alt": "x"}}"#))
            .unwrap_err();
        assert_eq!(err.path, "image.asset");
    }

    #[test]
    fn test_revalidation_is_identical() {
        let doc = parse(
            r#"{"_id": "dl", "name": "Deadlift", "difficulty": "advanced", "image": {"asset": "img"}}"#,
        );
        let first = validate_exercise(&doc).unwrap();

        let stored = serde_json::to_string(&first).unwrap();
        let reparsed: ExerciseDocument = serde_json::from_str(&stored).unwrap();
        let second = validate_exercise(&reparsed).unwrap();

        assert_eq!(first, second);
        assert_eq!(validate_exercise(&first.to_document()).unwrap(), first);
    }
}
