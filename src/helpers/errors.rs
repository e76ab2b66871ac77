//! Defining the pool's errors.
use pinocchio::error::ProgramError as P;

// All fields will be of type u32
#[repr(u32)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StableSwapError {
    InvalidInstructionData = 1,
    Unauthorized = 2,
    PoolNotActive = 3,
    AlreadyInitialized = 4,
    InvalidTokenCount = 5,
    DuplicateToken = 6,
    InvalidDecimals = 7,
    InvalidIndex = 8,
    SameToken = 9,
    UnknownToken = 10,
    InvalidAmount = 11,
    Expired = 12,
    InsufficientOutput = 13,
    ExcessiveInput = 14,
    MintBelowMinimum = 15,
    BurnExceedsMaximum = 16,
    WithdrawalBelowMinimum = 17,
    CapExceeded = 18,
    InsufficientLiquidity = 19,
    InsufficientBalance = 20,
    FeeTooHigh = 21,
    InvalidAmplification = 22,
    RampInProgress = 23,
    RampTooSoon = 24,
    InvalidDuration = 25,
    ExcessiveChange = 26,
    RampNotActive = 27,
    DidNotConverge = 28,
    MathOverflow = 29,
}

impl StableSwapError {
    const ALL: [StableSwapError; 29] = [
        Self::InvalidInstructionData, Self::Unauthorized, Self::PoolNotActive,
        Self::AlreadyInitialized, Self::InvalidTokenCount, Self::DuplicateToken,
        Self::InvalidDecimals, Self::InvalidIndex, Self::SameToken, Self::UnknownToken,
        Self::InvalidAmount, Self::Expired, Self::InsufficientOutput, Self::ExcessiveInput,
        Self::MintBelowMinimum, Self::BurnExceedsMaximum, Self::WithdrawalBelowMinimum,
        Self::CapExceeded, Self::InsufficientLiquidity, Self::InsufficientBalance,
        Self::FeeTooHigh, Self::InvalidAmplification, Self::RampInProgress,
        Self::RampTooSoon, Self::InvalidDuration, Self::ExcessiveChange,
        Self::RampNotActive, Self::DidNotConverge, Self::MathOverflow,
    ];

    /// Numeric code carried inside `ProgramError::Custom`.
    #[inline(always)]
    pub fn code(self) -> u32 {
        self as u32
    }

    pub fn from_code(code: u32) -> Option<Self> {
        Self::ALL.iter().copied().find(|e| e.code() == code)
    }

    /// Failures the caller can retry with different parameters or later state
    /// (deadline, slippage bounds, cap, balances). Everything else is a
    /// configuration or system error.
    pub fn is_retryable(self) -> bool {
        matches!(
            self,
            Self::Expired
                | Self::InsufficientOutput
                | Self::ExcessiveInput
                | Self::MintBelowMinimum
                | Self::BurnExceedsMaximum
                | Self::WithdrawalBelowMinimum
                | Self::CapExceeded
                | Self::InsufficientLiquidity
                | Self::InsufficientBalance
        )
    }
}

impl From<StableSwapError> for P {
    fn from(e: StableSwapError) -> Self {
        P::Custom(e as u32)
    }
}

impl From<P> for StableSwapError {
    fn from(e: P) -> Self {
        match e {
            P::Custom(code) => {
                StableSwapError::from_code(code).unwrap_or(StableSwapError::InvalidInstructionData)
            }
            P::MissingRequiredSignature => StableSwapError::Unauthorized,
            _ => StableSwapError::InvalidInstructionData,
        }
    }
}
