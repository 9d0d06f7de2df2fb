use eyre::{eyre, Result};
use secp256k1::SecretKey;
use web3::signing::{Key, SecretKeyRef};
use web3::types::Address;

/// Parses a hex encoded secp256k1 secret key, with or without `0x`
pub fn parse_private_key(key: &str) -> Result<SecretKey> {
    let trimmed = key.trim();
    let hex_key = trimmed.strip_prefix("0x").unwrap_or(trimmed);
    if hex_key.is_empty() {
        return Err(eyre!("private key is empty"));
    }

    let bytes = hex::decode(hex_key)?;
    if bytes.len() != 32 {
        return Err(eyre!("private key must be 32 bytes, got {}", bytes.len()));
    }

    SecretKey::from_slice(&bytes).map_err(|e| eyre!("invalid private key: {}", e))
}

/// Address of the account a private key signs for
pub fn signer_address(key: &str) -> Result<Address> {
    let secret = parse_private_key(key)?;
    Ok(SecretKeyRef::new(&secret).address())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    // First account of the public development mnemonic
    const DEV_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    #[test]
    fn derives_known_address() {
        let expected = Address::from_str("0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266").unwrap();
        assert_eq!(signer_address(DEV_KEY).unwrap(), expected);
        assert_eq!(signer_address(DEV_KEY.trim_start_matches("0x")).unwrap(), expected);
    }

    #[test]
    fn rejects_bad_keys() {
        assert!(parse_private_key("").is_err());
        assert!(parse_private_key("0x").is_err());
        assert!(parse_private_key("0xdead").is_err());
        assert!(parse_private_key("0xzz").is_err());
        assert!(parse_private_key(&format!("0x{}", "00".repeat(32))).is_err());
    }
}
