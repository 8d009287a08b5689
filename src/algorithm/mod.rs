/// Discretised diffusion operator in compressed diagonal storage
pub mod diffusion;
/// Floyd-Steinberg error-diffusion quantisation
pub mod dithering;
/// Belhachmi and random mask selection
pub mod mask_generation;
/// End-to-end inpainting orchestration
pub mod pipeline;
/// Conjugate gradient solver
pub mod solver;
