#![forbid(unsafe_code)]

use formgraph_core::Source;
use formgraph_view::{Upload, UploaderView, ViewKind, ViewType};

use super::ControlState;
use crate::value::ControlValue;

/// File upload slot.
#[derive(Debug, Clone, Default)]
pub struct Uploader {
    pub uploads: Source<Vec<Upload>>,
    pub multiple: bool,
}

impl Uploader {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_uploads(mut self, uploads: Vec<Upload>) -> Self {
        self.uploads = Source::Static(uploads);
        self
    }

    #[must_use]
    pub fn with_multiple(mut self, multiple: bool) -> Self {
        self.multiple = multiple;
        self
    }

    #[must_use]
    pub fn uploads(&self) -> Vec<Upload> {
        self.uploads.get()
    }
}

impl ControlState for Uploader {
    fn view_type(&self) -> ViewType {
        ViewType::Uploader
    }

    fn view_kind(&self) -> ViewKind {
        ViewKind::Uploader(UploaderView {
            uploads: self.uploads(),
            multiple: self.multiple,
        })
    }

    fn apply(&mut self, view: &ViewKind) {
        if let ViewKind::Uploader(view) = view {
            self.uploads.set(view.uploads.clone());
        }
    }

    fn value(&self) -> ControlValue {
        ControlValue::Uploads(self.uploads())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn starts_empty() {
        assert_eq!(Uploader::new().value(), ControlValue::Uploads(vec![]));
    }

    #[test]
    fn apply_takes_client_uploads() {
        let mut uploader = Uploader::new();
        let upload = Upload::new("some_file_id", "some_file_name", 123, date!(2020 - 05 - 01));
        uploader.apply(&ViewKind::Uploader(UploaderView {
            uploads: vec![upload.clone()],
            multiple: false,
        }));
        assert_eq!(uploader.value().as_uploads(), Some(&[upload][..]));
    }
}
