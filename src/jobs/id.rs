use rand::Rng;

const ID_LEN: usize = 7;
const ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Generates a short random base-36 job id
pub fn random_job_id() -> String {
    let mut rng = rand::thread_rng();
    (0..ID_LEN)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect()
}

/// Generates ids until one is not `taken`.
pub fn unique_job_id(taken: impl Fn(&str) -> bool) -> String {
    loop {
        let id = random_job_id();
        if !taken(&id) {
            return id;
        }
        tracing::debug!(id = %id, "Job id collision, regenerating");
    }
}
