pub mod deserializer;
pub mod serializer;
