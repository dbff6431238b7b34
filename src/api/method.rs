//! API method calls

/// Remote method names
pub mod methods {
    /// List the items in the caller's shoebox (paginated)
    pub const LIST_SHOEBOX_ITEMS: &str = "sfomuseum.you.shoebox.listItems";
    /// List the images of one collection object (paginated)
    pub const GET_OBJECT_IMAGES: &str = "sfomuseum.collection.objects.getImages";
    /// Detail record for one Instagram post
    pub const GET_INSTAGRAM_POST: &str = "sfomuseum.millsfield.instagram.getInfo";
    /// Caption for one collection image
    pub const GET_IMAGE_CAPTION: &str = "sfomuseum.collection.images.getCaption";
}

/// A remote method name and its arguments
///
/// Arguments keep insertion order; setting an existing key replaces its
/// value in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodCall {
    method: String,
    args: Vec<(String, String)>,
}

impl MethodCall {
    /// Create a call with no arguments
    pub fn new(method: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            args: Vec::new(),
        }
    }

    /// Add or replace an argument (builder style)
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.set(key, value);
        self
    }

    /// Add or replace an argument
    pub fn set(&mut self, key: impl Into<String>, value: impl ToString) {
        let key = key.into();
        let value = value.to_string();
        match self.args.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.args.push((key, value)),
        }
    }

    /// Look up an argument
    pub fn get(&self, key: &str) -> Option<&str> {
        self.args
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Method name
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Arguments in insertion order
    pub fn args(&self) -> &[(String, String)] {
        &self.args
    }
}
