use std::collections::BTreeMap;

use kube::Resource;

/// Access to the label and annotation maps of an object
pub trait ObjectMetadata {
    fn labels(&self) -> Option<&BTreeMap<String, String>>;
    fn labels_mut(&mut self) -> &mut Option<BTreeMap<String, String>>;
    fn annotations(&self) -> Option<&BTreeMap<String, String>>;
    fn annotations_mut(&mut self) -> &mut Option<BTreeMap<String, String>>;
}

impl<K: Resource> ObjectMetadata for K {
    fn labels(&self) -> Option<&BTreeMap<String, String>> {
        self.meta().labels.as_ref()
    }

    fn labels_mut(&mut self) -> &mut Option<BTreeMap<String, String>> {
        &mut self.meta_mut().labels
    }

    fn annotations(&self) -> Option<&BTreeMap<String, String>> {
        self.meta().annotations.as_ref()
    }

    fn annotations_mut(&mut self) -> &mut Option<BTreeMap<String, String>> {
        &mut self.meta_mut().annotations
    }
}

/// Set a label on the object, creating the label map if needed
pub fn add_label<O: ObjectMetadata + ?Sized>(obj: &mut O, key: &str, value: &str) {
    obj.labels_mut()
        .get_or_insert_with(BTreeMap::new)
        .insert(key.into(), value.into());
}

/// Remove a label from the object, if present
pub fn remove_label<O: ObjectMetadata + ?Sized>(obj: &mut O, key: &str) {
    if let Some(labels) = obj.labels_mut() {
        labels.remove(key);
    }
}

/// Set an annotation on the object, creating the annotation map if needed
pub fn add_annotation<O: ObjectMetadata + ?Sized>(obj: &mut O, key: &str, value: &str) {
    obj.annotations_mut()
        .get_or_insert_with(BTreeMap::new)
        .insert(key.into(), value.into());
}
