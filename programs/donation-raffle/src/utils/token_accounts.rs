use anchor_lang::prelude::*;
use anchor_spl::token::{self, TokenAccount, Transfer};

use crate::error::RaffleError;

/// Loads a token account passed through `remaining_accounts` and checks that
/// it holds `mint` and belongs to `authority`.
pub fn load_token_account(
    info: &AccountInfo,
    mint: &Pubkey,
    authority: &Pubkey,
) -> Result<TokenAccount> {
    require_keys_eq!(*info.owner, token::ID, RaffleError::InvalidTokenAccount);

    let data = info.try_borrow_data()?;
    let account = TokenAccount::try_deserialize(&mut &data[..])?;

    require_keys_eq!(account.mint, *mint, RaffleError::InvalidMint);
    require_keys_eq!(account.owner, *authority, RaffleError::InvalidTokenAccount);

    Ok(account)
}

/// Moves `amount` out of a vault owned by a raffle PDA. Zero amounts are
/// skipped.
pub fn transfer_from_vault<'info>(
    token_program: &AccountInfo<'info>,
    vault: &AccountInfo<'info>,
    destination: &AccountInfo<'info>,
    raffle: &AccountInfo<'info>,
    signer_seeds: &[&[u8]],
    amount: u64,
) -> Result<()> {
    if amount == 0 {
        return Ok(());
    }

    let cpi_accounts = Transfer {
        from: vault.clone(),
        to: destination.clone(),
        authority: raffle.clone(),
    };
    token::transfer(
        CpiContext::new(token_program.clone(), cpi_accounts).with_signer(&[signer_seeds]),
        amount,
    )
}
