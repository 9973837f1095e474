/// Image loading for inkascii: decodes files into the core `Image` type.

pub mod image;
