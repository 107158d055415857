//! Body-part rig: the static part table and the segmenter that crops it out of the base image.

/// Body-part table and padding configuration.
pub mod parts;
/// Part Segmenter: base image + skeleton -> part crops.
pub mod segment;
