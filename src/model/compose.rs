//! Submission form state
//!
//! Holds everything the upload form collects: the photo attachment, the
//! resolved coordinate, and the free-text fields. The form regenerates
//! its full section sequence after every change; screens render that and
//! never mutate rows in place.

use super::content::{ContentRow, ContentSection};
use super::submission::{normalize_field, Coordinate, SubmissionUpload};

/// Row group tags for the form sections
pub mod group {
    pub const PHOTO: &str = "photo";
    pub const MAP: &str = "map";
    pub const UPDATE_LOCATION: &str = "update-location";
    pub const TITLE: &str = "title";
    pub const ARTIST: &str = "artist";
    pub const NOTE: &str = "note";
}

/// Longest note the service accepts
pub const MAX_NOTE_CHARS: usize = 1000;

pub const PHOTO_REQUIRED_MESSAGE: &str = "A photo is required before submitting.";
const NOTE_FOOTER: &str = "Optional. Anything worth knowing about this piece.";

/// Editable free-text fields on the form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Title,
    Artist,
    Note,
}

/// A decoded, downscaled photo ready to attach to the form
#[derive(Debug, Clone, PartialEq)]
pub struct PhotoAttachment {
    pub file_name: String,
    /// JPEG-encoded bytes, already capped to the upload resolution
    pub jpeg: Vec<u8>,
    pub width: u32,
    pub height: u32,
    /// GPS position embedded in the photo, if any
    pub coordinate: Option<Coordinate>,
}

#[derive(Debug, Clone)]
struct EditState {
    field: Field,
    buffer: String,
}

/// State backing the submission form
#[derive(Debug)]
pub struct ComposeForm {
    photo: Option<PhotoAttachment>,
    /// Coordinate from photo metadata, the device lookup, or a manual pick
    photo_coordinate: Option<Coordinate>,
    /// Fallback when no photo coordinate was resolved
    default_coordinate: Coordinate,
    title: String,
    artist: String,
    note: String,
    edit: Option<EditState>,
}

impl ComposeForm {
    pub fn new(default_coordinate: Coordinate) -> Self {
        Self {
            photo: None,
            photo_coordinate: None,
            default_coordinate,
            title: String::new(),
            artist: String::new(),
            note: String::new(),
            edit: None,
        }
    }

    pub fn photo(&self) -> Option<&PhotoAttachment> {
        self.photo.as_ref()
    }

    pub fn has_photo(&self) -> bool {
        self.photo.is_some()
    }

    pub fn photo_coordinate(&self) -> Option<Coordinate> {
        self.photo_coordinate
    }

    /// Coordinate the upload will carry: the photo coordinate when one
    /// was resolved, the configured default otherwise
    pub fn resolved_coordinate(&self) -> Coordinate {
        self.photo_coordinate.unwrap_or(self.default_coordinate)
    }

    /// Attach a photo, adopting its embedded GPS position when present
    pub fn attach_photo(&mut self, photo: PhotoAttachment) {
        if let Some(coordinate) = photo.coordinate {
            self.photo_coordinate = Some(coordinate);
        }
        self.photo = Some(photo);
    }

    /// Remove the photo and any coordinate that came with it
    pub fn reset_photo(&mut self) {
        self.photo = None;
        self.photo_coordinate = None;
    }

    /// Adopt a device location sample
    ///
    /// Returns false when a coordinate is already attached; the sample is
    /// discarded in that case so only the first one ever lands.
    pub fn apply_location_sample(&mut self, coordinate: Coordinate) -> bool {
        if self.photo_coordinate.is_some() {
            return false;
        }
        self.photo_coordinate = Some(coordinate);
        true
    }

    /// Adopt a manually picked coordinate
    pub fn set_manual_coordinate(&mut self, coordinate: Coordinate) {
        self.photo_coordinate = Some(coordinate);
    }

    // ─────────────────────────────────────────────────────────────────────
    // Field editing
    // ─────────────────────────────────────────────────────────────────────

    pub fn field_value(&self, field: Field) -> &str {
        match field {
            Field::Title => &self.title,
            Field::Artist => &self.artist,
            Field::Note => &self.note,
        }
    }

    /// Start editing a field, seeding the buffer with its current value
    pub fn begin_edit(&mut self, field: Field) {
        self.edit = Some(EditState {
            field,
            buffer: self.field_value(field).to_string(),
        });
    }

    pub fn editing(&self) -> Option<Field> {
        self.edit.as_ref().map(|e| e.field)
    }

    pub fn edit_buffer(&self) -> Option<&str> {
        self.edit.as_ref().map(|e| e.buffer.as_str())
    }

    /// Append a character to the edit buffer
    ///
    /// Note input past the length cap is ignored.
    pub fn input_char(&mut self, c: char) {
        if let Some(edit) = &mut self.edit {
            if edit.field == Field::Note && edit.buffer.chars().count() >= MAX_NOTE_CHARS {
                return;
            }
            edit.buffer.push(c);
        }
    }

    pub fn backspace(&mut self) {
        if let Some(edit) = &mut self.edit {
            edit.buffer.pop();
        }
    }

    /// Write the buffer back into the field and leave edit mode
    pub fn commit_edit(&mut self) {
        if let Some(edit) = self.edit.take() {
            match edit.field {
                Field::Title => self.title = edit.buffer,
                Field::Artist => self.artist = edit.buffer,
                Field::Note => self.note = edit.buffer,
            }
        }
    }

    /// Leave edit mode without touching the field
    pub fn cancel_edit(&mut self) {
        self.edit = None;
    }

    // ─────────────────────────────────────────────────────────────────────
    // Submission
    // ─────────────────────────────────────────────────────────────────────

    /// Package the form into an upload value
    ///
    /// Fails when no photo is attached. Text fields are trimmed and
    /// collapsed to absent; they never block submission.
    pub fn build_upload(&self) -> Result<SubmissionUpload, String> {
        let photo = self
            .photo
            .as_ref()
            .ok_or_else(|| PHOTO_REQUIRED_MESSAGE.to_string())?;

        Ok(SubmissionUpload {
            image: photo.jpeg.clone(),
            coordinate: self.resolved_coordinate(),
            title: normalize_field(&self.title),
            artist: normalize_field(&self.artist),
            note: normalize_field(&self.note),
        })
    }

    // ─────────────────────────────────────────────────────────────────────
    // Section building
    // ─────────────────────────────────────────────────────────────────────

    /// Regenerate the full section sequence from current state
    pub fn build_sections(&self) -> Vec<ContentSection<()>> {
        let photo_text = match &self.photo {
            Some(photo) => format!(
                "{} ({}x{})",
                photo.file_name, photo.width, photo.height
            ),
            None => "No photo attached. Press Enter to add one.".to_string(),
        };

        let location_text = match self.photo_coordinate {
            Some(coordinate) => format!("Location: {}", coordinate),
            None => format!("Location: {} (default)", self.default_coordinate),
        };

        vec![
            ContentSection::new(vec![ContentRow::new(group::PHOTO)
                .with_text(photo_text)
                .with_height(3)])
            .with_title("Photo"),
            ContentSection::new(vec![
                ContentRow::new(group::MAP).with_text(location_text),
                ContentRow::new(group::UPDATE_LOCATION).with_text("Update Location"),
            ])
            .with_title("Location"),
            ContentSection::new(vec![
                ContentRow::new(group::TITLE)
                    .with_text(field_row_text("Title", &self.title)),
                ContentRow::new(group::ARTIST)
                    .with_text(field_row_text("Artist", &self.artist)),
            ])
            .with_title("Additional Information"),
            ContentSection::new(vec![ContentRow::new(group::NOTE)
                .with_text(field_row_text("Note", &self.note))
                .with_height(4)])
            .with_title("Notes")
            .with_footer(NOTE_FOOTER),
        ]
    }
}

fn field_row_text(label: &str, value: &str) -> String {
    if value.trim().is_empty() {
        format!("{}: -", label)
    } else {
        format!("{}: {}", label, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_coordinate() -> Coordinate {
        Coordinate::new(27.773, -82.64)
    }

    fn photo() -> PhotoAttachment {
        PhotoAttachment {
            file_name: "wall.jpg".to_string(),
            jpeg: vec![0xff, 0xd8, 0xff, 0xd9],
            width: 1024,
            height: 768,
            coordinate: None,
        }
    }

    #[test]
    fn test_upload_requires_photo() {
        let form = ComposeForm::new(default_coordinate());
        let err = form.build_upload().unwrap_err();
        assert_eq!(err, PHOTO_REQUIRED_MESSAGE);
    }

    #[test]
    fn test_upload_packages_trimmed_fields() {
        let mut form = ComposeForm::new(default_coordinate());
        form.attach_photo(photo());
        form.set_manual_coordinate(Coordinate::new(37.0, -122.0));

        form.begin_edit(Field::Title);
        for c in "Mural".chars() {
            form.input_char(c);
        }
        form.commit_edit();

        form.begin_edit(Field::Artist);
        for c in "   ".chars() {
            form.input_char(c);
        }
        form.commit_edit();

        let upload = form.build_upload().unwrap();
        assert_eq!(upload.title, Some("Mural".to_string()));
        assert_eq!(upload.artist, None);
        assert_eq!(upload.note, None);
        assert_eq!(upload.coordinate, Coordinate::new(37.0, -122.0));
        assert_eq!(upload.image, vec![0xff, 0xd8, 0xff, 0xd9]);
    }

    #[test]
    fn test_upload_falls_back_to_default_coordinate() {
        let mut form = ComposeForm::new(default_coordinate());
        form.attach_photo(photo());

        let upload = form.build_upload().unwrap();
        assert_eq!(upload.coordinate, default_coordinate());
    }

    #[test]
    fn test_first_location_sample_wins() {
        let mut form = ComposeForm::new(default_coordinate());

        assert!(form.apply_location_sample(Coordinate::new(40.0, -74.0)));
        assert!(!form.apply_location_sample(Coordinate::new(51.5, -0.1)));
        assert_eq!(form.photo_coordinate(), Some(Coordinate::new(40.0, -74.0)));
    }

    #[test]
    fn test_location_sample_discarded_after_photo_metadata() {
        let mut form = ComposeForm::new(default_coordinate());
        let mut tagged = photo();
        tagged.coordinate = Some(Coordinate::new(35.68, 139.69));
        form.attach_photo(tagged);

        assert!(!form.apply_location_sample(Coordinate::new(40.0, -74.0)));
        assert_eq!(
            form.photo_coordinate(),
            Some(Coordinate::new(35.68, 139.69))
        );
    }

    #[test]
    fn test_reset_photo_clears_coordinate() {
        let mut form = ComposeForm::new(default_coordinate());
        let mut tagged = photo();
        tagged.coordinate = Some(Coordinate::new(35.68, 139.69));
        form.attach_photo(tagged);

        form.reset_photo();
        assert!(!form.has_photo());
        assert_eq!(form.photo_coordinate(), None);
        assert_eq!(form.resolved_coordinate(), default_coordinate());
    }

    #[test]
    fn test_edit_commit_and_cancel() {
        let mut form = ComposeForm::new(default_coordinate());

        form.begin_edit(Field::Title);
        form.input_char('H');
        form.input_char('i');
        form.commit_edit();
        assert_eq!(form.field_value(Field::Title), "Hi");
        assert_eq!(form.editing(), None);

        form.begin_edit(Field::Title);
        form.backspace();
        form.cancel_edit();
        assert_eq!(form.field_value(Field::Title), "Hi");
    }

    #[test]
    fn test_note_input_capped() {
        let mut form = ComposeForm::new(default_coordinate());
        form.begin_edit(Field::Note);
        for _ in 0..(MAX_NOTE_CHARS + 25) {
            form.input_char('x');
        }
        form.commit_edit();
        assert_eq!(form.field_value(Field::Note).chars().count(), MAX_NOTE_CHARS);
    }

    #[test]
    fn test_title_input_not_capped_by_note_limit() {
        let mut form = ComposeForm::new(default_coordinate());
        form.begin_edit(Field::Title);
        for _ in 0..(MAX_NOTE_CHARS + 5) {
            form.input_char('x');
        }
        form.commit_edit();
        assert!(form.field_value(Field::Title).chars().count() > MAX_NOTE_CHARS);
    }

    #[test]
    fn test_sections_cover_form_state() {
        let mut form = ComposeForm::new(default_coordinate());
        let sections = form.build_sections();

        assert_eq!(sections.len(), 4);
        let groups: Vec<&str> = sections
            .iter()
            .flat_map(|s| s.rows.iter().map(|r| r.group))
            .collect();
        assert_eq!(
            groups,
            vec![
                group::PHOTO,
                group::MAP,
                group::UPDATE_LOCATION,
                group::TITLE,
                group::ARTIST,
                group::NOTE
            ]
        );

        // Empty form advertises the default coordinate
        let map_text = sections[1].rows[0].text.clone().unwrap();
        assert!(map_text.contains("(default)"));

        // Attaching state shows up after a rebuild
        form.attach_photo(photo());
        form.set_manual_coordinate(Coordinate::new(37.0, -122.0));
        let sections = form.build_sections();
        let photo_text = sections[0].rows[0].text.clone().unwrap();
        assert!(photo_text.contains("wall.jpg"));
        let map_text = sections[1].rows[0].text.clone().unwrap();
        assert!(map_text.contains("37.0000"));
        assert!(!map_text.contains("(default)"));
    }
}
