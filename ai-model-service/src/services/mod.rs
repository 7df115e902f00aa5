pub mod hf_inference_service;
pub mod ollama_service;
