use anchor_lang::prelude::*;

use crate::{create_stream_authority_address, StreamAuthority, StreamError};

/// Reads the Stream Authority record for `mint` from `info`.
///
/// Fails with `RecordNotFound` when the account was never created by this program and with
/// `InvalidDerivation` when the record does not belong to `mint` or its stored bump does not
/// reproduce `info`'s address.
pub fn load_stream_authority(info: &AccountInfo, mint: &Pubkey) -> Result<StreamAuthority> {
    if info.owner != &crate::ID || info.data_is_empty() {
        return err!(StreamError::RecordNotFound);
    }

    let record = {
        let data = info.try_borrow_data()?;
        let mut bytes: &[u8] = &data;
        StreamAuthority::try_deserialize(&mut bytes)?
    };

    require_keys_eq!(record.mint, *mint, StreamError::InvalidDerivation);
    let derived = create_stream_authority_address(mint, record.bump)
        .map_err(|_| error!(StreamError::InvalidDerivation))?;
    require_keys_eq!(derived, *info.key, StreamError::InvalidDerivation);

    Ok(record)
}

/// Writes `record` back into `info`, discriminator included.
pub fn store_stream_authority(info: &AccountInfo, record: &StreamAuthority) -> Result<()> {
    let mut data = info.try_borrow_mut_data()?;
    let mut writer: &mut [u8] = &mut data[..];
    record.try_serialize(&mut writer)
}
