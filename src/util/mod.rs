//! Small helpers shared by the parser and the serializer.

pub mod qname;
