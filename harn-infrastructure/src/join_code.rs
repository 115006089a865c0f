use harn_application::JoinCodeGenerator;
use harn_domain::{JOIN_CODE_ALPHABET, JOIN_CODE_LEN, JoinCode};
use rand::Rng;

/// Draws join codes uniformly from `A-Z0-9`.
#[derive(Default)]
pub struct RandomJoinCodeGenerator;

impl JoinCodeGenerator for RandomJoinCodeGenerator {
    fn generate(&self) -> JoinCode {
        let mut rng = rand::thread_rng();
        let mut indices = [0usize; JOIN_CODE_LEN];
        for idx in &mut indices {
            *idx = rng.gen_range(0..JOIN_CODE_ALPHABET.len());
        }
        JoinCode::from_indices(indices)
    }
}
