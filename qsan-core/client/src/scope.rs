//! 登录 scope 字符串
//!
//! CSI 调用路径要求 scope 中携带经 AES-256-ECB 加密的密码：
//! `csi.readwrite|<base64(密文)>`。

use aes::cipher::generic_array::GenericArray;
use aes::cipher::{BlockEncrypt, KeyInit};
use aes::Aes256;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;

const CSI_SCOPE: &str = "csi.readwrite";
const SCOPE_KEY: &[u8] = b"qsanscope1234";
const BLOCK_SIZE: usize = 16;

/// 生成 CSI 登录使用的 scope 字符串
pub fn csi_scopes(password: &str) -> String {
    let encrypted = aes_ecb_encrypt(password.as_bytes());
    format!("{}|{}", CSI_SCOPE, STANDARD.encode(encrypted))
}

fn scope_key() -> [u8; 32] {
    let mut key = [0u8; 32];
    key[..SCOPE_KEY.len()].copy_from_slice(SCOPE_KEY);
    key
}

fn pkcs7_pad(data: &[u8]) -> Vec<u8> {
    let padding = BLOCK_SIZE - data.len() % BLOCK_SIZE;
    let mut padded = Vec::with_capacity(data.len() + padding);
    padded.extend_from_slice(data);
    padded.resize(data.len() + padding, padding as u8);
    padded
}

fn aes_ecb_encrypt(plaintext: &[u8]) -> Vec<u8> {
    let key = scope_key();
    let cipher = Aes256::new(GenericArray::from_slice(&key));

    let mut data = pkcs7_pad(plaintext);
    for chunk in data.chunks_exact_mut(BLOCK_SIZE) {
        cipher.encrypt_block(GenericArray::from_mut_slice(chunk));
    }
    data
}
