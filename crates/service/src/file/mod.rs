pub mod chirpy_store;
