//! ChaCha20 keystream generation, gated behind the `cipher` feature.
//! `VBuffer::encrypt`/`decrypt` XOR the payload with this keystream, so
//! encryption and decryption are the same operation.

#![cfg(feature = "cipher")]

fn rotl32(x: u32, n: u32) -> u32 {
    x.rotate_left(n)
}

fn quarter_round(state: &mut [u32; 16], a: usize, b: usize, c: usize, d: usize) {
    state[a] = state[a].wrapping_add(state[b]);
    state[d] ^= state[a];
    state[d] = rotl32(state[d], 16);
    state[c] = state[c].wrapping_add(state[d]);
    state[b] ^= state[c];
    state[b] = rotl32(state[b], 12);
    state[a] = state[a].wrapping_add(state[b]);
    state[d] ^= state[a];
    state[d] = rotl32(state[d], 8);
    state[c] = state[c].wrapping_add(state[d]);
    state[b] ^= state[c];
    state[b] = rotl32(state[b], 7);
}

fn block(key: &[u32; 8], nonce: &[u32; 3], counter: u32) -> [u8; 64] {
    let mut state = [0u32; 16];
    state[0] = 0x6170_7865;
    state[1] = 0x3320_646e;
    state[2] = 0x7962_2d32;
    state[3] = 0x6b20_6574;
    state[4..12].copy_from_slice(key);
    state[12] = counter;
    state[13] = nonce[0];
    state[14] = nonce[1];
    state[15] = nonce[2];

    let initial = state;
    for _ in 0..10 {
        quarter_round(&mut state, 0, 4, 8, 12);
        quarter_round(&mut state, 1, 5, 9, 13);
        quarter_round(&mut state, 2, 6, 10, 14);
        quarter_round(&mut state, 3, 7, 11, 15);
        quarter_round(&mut state, 0, 5, 10, 15);
        quarter_round(&mut state, 1, 6, 11, 12);
        quarter_round(&mut state, 2, 7, 8, 13);
        quarter_round(&mut state, 3, 4, 9, 14);
    }
    for i in 0..16 {
        state[i] = state[i].wrapping_add(initial[i]);
    }

    let mut out = [0u8; 64];
    for (i, word) in state.iter().enumerate() {
        out[i * 4..i * 4 + 4].copy_from_slice(&word.to_le_bytes());
    }
    out
}

fn words_le(bytes: &[u8], count: usize) -> Vec<u32> {
    bytes
        .chunks_exact(4)
        .take(count)
        .map(|c| u32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect()
}

/// XORs `data` against a ChaCha20 keystream derived from `key` and `nonce`.
pub fn chacha20_xor(key: &[u8; 32], nonce: &[u8; 12], data: &[u8]) -> Vec<u8> {
    let key_words: [u32; 8] = words_le(key, 8).try_into().unwrap();
    let nonce_words: [u32; 3] = words_le(nonce, 3).try_into().unwrap();

    let mut out = Vec::with_capacity(data.len());
    for (i, chunk) in data.chunks(64).enumerate() {
        let keystream = block(&key_words, &nonce_words, i as u32 + 1);
        for (b, k) in chunk.iter().zip(keystream.iter()) {
            out.push(b ^ k);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encrypt_then_decrypt_is_identity() {
        let key = [7u8; 32];
        let nonce = [1u8; 12];
        let plaintext = b"the quick brown fox jumps over the lazy dog";
        let ciphertext = chacha20_xor(&key, &nonce, plaintext);
        assert_ne!(ciphertext, plaintext);
        let roundtrip = chacha20_xor(&key, &nonce, &ciphertext);
        assert_eq!(roundtrip, plaintext);
    }
}
