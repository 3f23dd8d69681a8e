pub mod json_document_store;
