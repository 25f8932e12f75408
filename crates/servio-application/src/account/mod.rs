//! Sign-in, sign-up and password reset flows.

mod usecase;

pub use usecase::AccountUseCase;
