use anchor_lang::error_code;

#[error_code]
pub enum RaffleError {
    Overflow,
    #[msg("Start time must be before end time")]
    IncorrectTimesGiven,
    #[msg("Raffle has ended")]
    RaffleHasEnded,
    #[msg("Raffle has not ended yet")]
    RaffleHasNotEnded,
    #[msg("Raffle has not started yet")]
    RaffleHasNotStarted,
    #[msg("Donation is below the raffle minimum")]
    DonationTooLow,
    #[msg("Minimum donation must be greater than zero")]
    MinimumDonationTooLow,
    #[msg("Prize needs at least one share for the platform and one for the author")]
    PrizeQuantityTooLow,
    #[msg("Prize quantity exceeds the maximum number of shares a settlement can draw")]
    PrizeQuantityTooHigh,
    #[msg("Raffle has been cancelled")]
    RaffleCancelled,
    #[msg("Raffle prize has already been distributed")]
    RaffleAlreadyRewarded,
    #[msg("Raffle has not been settled yet")]
    RaffleNotRewarded,
    #[msg("Donor has no claimable rewards for this raffle")]
    CannotClaimRewards,
    #[msg("Token rewards are not enabled for this raffle")]
    NoRewardsForRaffle,
    #[msg("Token rewards are already enabled for this raffle")]
    RewardsAlreadyEnabled,
    #[msg("Requested amount exceeds the withdrawable reward balance")]
    InsufficientAmount,
    #[msg("Raffle donations have already been released")]
    DonationsAlreadyReleased,
    #[msg("No donor with a positive weight to draw from")]
    NoEligibleDonors,
    #[msg("Zero address is not allowed")]
    ZeroAddressNotAllowed,
    #[msg("Fee percentages must be within 0 and 100")]
    InvalidFee,
    #[msg("Raffle id does not match the next raffle id")]
    InvalidRaffleId,
    #[msg("Token account mint does not match")]
    InvalidMint,
    #[msg("Token account is not owned by the expected wallet")]
    InvalidTokenAccount,
    #[msg("One token account per donor must be supplied, in donor order")]
    DonorAccountsMismatch,
    #[msg("Raffle has reached its maximum number of donors")]
    TooManyDonors,
    #[msg("Invalid SlotHashes account provided")]
    InvalidSlotHashesAccount,
    #[msg("Curator list is full")]
    CuratorListFull,
    #[msg("Caller is missing the required role")]
    MissingRole,
}
