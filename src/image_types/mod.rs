use strum::{Display, EnumIter, EnumString};

/// Extensions accepted for uploaded photos.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Display, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ImageExtension {
    Png,
    Jpg,
    Jpeg,
    Gif,
    Webp,
}

impl ImageExtension {
    /// Looks at the part of `filename` after its last dot, ignoring case.
    pub fn from_filename(filename: &str) -> Option<ImageExtension> {
        let (_stem, extension) = filename.rsplit_once('.')?;
        extension.parse().ok()
    }

    /// Human-readable list of accepted extensions, e.g. for error messages.
    pub fn allowed_list() -> String {
        use strum::IntoEnumIterator;

        ImageExtension::iter()
            .map(|e| e.to_string())
            .collect::<Vec<String>>()
            .join("/")
    }
}
