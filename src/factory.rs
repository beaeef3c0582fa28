//! Wallet deployment orchestration.
//!
//! The factory computes the effective salt, derives the target address,
//! and materializes the proxy through an injected [`Ledger`] capability.
//! Each deployment is all-or-nothing: on any error the ledger is left
//! exactly as it was found.

use std::collections::HashMap;

use crate::crypto::proxy::init_code;
use crate::crypto::{recover_controller, Address, SaltScheme};
use crate::error::FactoryError;
use crate::predict;

/// Outcome of the deterministic creation primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateOutcome {
    /// Code was placed at the address.
    Created,
    /// The address already holds code; nothing was written.
    Occupied,
}

/// The ledger capability a factory deploys through.
///
/// `attempt_create` is the atomic occupancy-check-and-create primitive;
/// `initialize_wallet` is the wallet's one-time controller handoff;
/// `revert_create` undoes a create when a later step fails, so the whole
/// deployment commits all-or-nothing even without a host transaction.
pub trait Ledger {
    /// Atomically places `code` at `address` if no code is present there.
    fn attempt_create(&mut self, address: Address, code: &[u8]) -> CreateOutcome;

    /// Invokes the one-time initialization entry point of a freshly
    /// created wallet, handing it its controller.
    fn initialize_wallet(&mut self, wallet: Address, controller: Address) -> Result<(), String>;

    /// Removes the code placed by `attempt_create` earlier in the same
    /// deployment. Only called after that create returned `Created`.
    fn revert_create(&mut self, address: Address);
}

/// In-memory ledger for tests and simulation.
///
/// Stores init code verbatim (there is no execution environment to run
/// it) and records each wallet's controller on initialization.
#[derive(Debug, Default)]
pub struct InMemoryLedger {
    code: HashMap<Address, Vec<u8>>,
    controllers: HashMap<Address, Address>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the code at `address`, if any.
    pub fn code_at(&self, address: &Address) -> Option<&[u8]> {
        self.code.get(address).map(Vec::as_slice)
    }

    /// Returns the controller a wallet was initialized with, if any.
    pub fn controller_of(&self, wallet: &Address) -> Option<Address> {
        self.controllers.get(wallet).copied()
    }
}

impl Ledger for InMemoryLedger {
    fn attempt_create(&mut self, address: Address, code: &[u8]) -> CreateOutcome {
        if self.code.contains_key(&address) {
            return CreateOutcome::Occupied;
        }
        self.code.insert(address, code.to_vec());
        CreateOutcome::Created
    }

    fn initialize_wallet(&mut self, wallet: Address, controller: Address) -> Result<(), String> {
        if self.controllers.contains_key(&wallet) {
            return Err(format!("wallet {} is already initialized", wallet));
        }
        self.controllers.insert(wallet, controller);
        Ok(())
    }

    fn revert_create(&mut self, address: Address) {
        self.code.remove(&address);
    }
}

/// A wallet factory bound to one address, one salt scheme, and one ledger.
pub struct Factory<L> {
    address: Address,
    scheme: SaltScheme,
    ledger: L,
}

impl<L: Ledger> Factory<L> {
    /// Creates a factory instance. The salt scheme is pinned for the
    /// lifetime of the instance; there is no default.
    pub fn new(address: Address, scheme: SaltScheme, ledger: L) -> Self {
        Self {
            address,
            scheme,
            ledger,
        }
    }

    /// The factory's own address (the creation-primitive deployer).
    pub fn address(&self) -> Address {
        self.address
    }

    /// The active salt scheme for the unsigned path.
    pub fn scheme(&self) -> SaltScheme {
        self.scheme
    }

    /// Read access to the underlying ledger.
    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    /// Deploys a wallet for a caller-asserted controller and raw salt.
    ///
    /// The raw salt is mixed through the configured scheme, never used
    /// directly; the resulting address is a pure function of (factory,
    /// effective salt, implementation).
    pub fn deploy_unsigned(
        &mut self,
        implementation: Address,
        controller: Address,
        raw_salt: &[u8; 32],
    ) -> Result<Address, FactoryError> {
        let prediction =
            predict::unsigned_wallet_address(self.address, self.scheme, implementation, raw_salt)?;
        self.materialize(prediction.address, implementation, controller)
    }

    /// Deploys a wallet for the controller recovered from `proof`.
    ///
    /// The effective salt is the hash of the controller identity, so the
    /// address is independent of who submits the proof. A repeat
    /// submission collides with the controller's own earlier deployment.
    pub fn deploy_signed(
        &mut self,
        implementation: Address,
        proof: &[u8],
    ) -> Result<Address, FactoryError> {
        let controller = recover_controller(proof)?;
        let prediction =
            predict::controller_wallet_address(self.address, implementation, controller)?;
        self.materialize(prediction.address, implementation, controller)
    }

    fn materialize(
        &mut self,
        address: Address,
        implementation: Address,
        controller: Address,
    ) -> Result<Address, FactoryError> {
        let code = init_code(implementation);
        match self.ledger.attempt_create(address, &code) {
            CreateOutcome::Occupied => Err(FactoryError::AddressCollision(address)),
            CreateOutcome::Created => {
                if let Err(reason) = self.ledger.initialize_wallet(address, controller) {
                    self.ledger.revert_create(address);
                    return Err(FactoryError::Initialization(reason));
                }
                Ok(address)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::{sign_approval, Keypair};

    fn addr(byte: u8) -> Address {
        Address::from_bytes([byte; 20])
    }

    fn factory(scheme: SaltScheme) -> Factory<InMemoryLedger> {
        Factory::new(addr(0xaa), scheme, InMemoryLedger::new())
    }

    #[test]
    fn test_factory_exposes_address_and_scheme() {
        let f = factory(SaltScheme::XorMix);
        assert_eq!(f.address(), addr(0xaa));
        assert_eq!(f.scheme(), SaltScheme::XorMix);
    }

    #[test]
    fn test_unsigned_deploy_places_code_and_controller() {
        let mut f = factory(SaltScheme::HashMix);
        let wallet = f
            .deploy_unsigned(addr(0xbb), addr(0xcc), &[0u8; 32])
            .unwrap();

        let code = f.ledger().code_at(&wallet).expect("code present");
        assert_eq!(code, init_code(addr(0xbb)).as_slice());
        assert_eq!(f.ledger().controller_of(&wallet), Some(addr(0xcc)));
    }

    #[test]
    fn test_unsigned_deploy_matches_prediction() {
        let predicted = predict::unsigned_wallet_address(
            addr(0xaa),
            SaltScheme::HashMix,
            addr(0xbb),
            &[0u8; 32],
        )
        .unwrap();

        let mut f = factory(SaltScheme::HashMix);
        let wallet = f
            .deploy_unsigned(addr(0xbb), addr(0xcc), &[0u8; 32])
            .unwrap();
        assert_eq!(wallet, predicted.address);
    }

    #[test]
    fn test_redeploy_collides_and_preserves_code() {
        let mut f = factory(SaltScheme::HashMix);
        let wallet = f
            .deploy_unsigned(addr(0xbb), addr(0xcc), &[0u8; 32])
            .unwrap();
        let before = f.ledger().code_at(&wallet).unwrap().to_vec();

        let err = f
            .deploy_unsigned(addr(0xbb), addr(0xcc), &[0u8; 32])
            .unwrap_err();
        assert_eq!(err, FactoryError::AddressCollision(wallet));
        assert_eq!(f.ledger().code_at(&wallet).unwrap(), before.as_slice());
    }

    #[test]
    fn test_zero_implementation_rejected_on_both_paths() {
        let mut f = factory(SaltScheme::HashMix);
        assert_eq!(
            f.deploy_unsigned(Address::ZERO, addr(0xcc), &[0u8; 32]),
            Err(FactoryError::InvalidImplementation)
        );

        let proof = sign_approval(&Keypair::generate());
        assert_eq!(
            f.deploy_signed(Address::ZERO, &proof),
            Err(FactoryError::InvalidImplementation)
        );
    }

    #[test]
    fn test_same_inputs_same_address_across_instances() {
        let mut first = factory(SaltScheme::HashMix);
        let mut second = factory(SaltScheme::HashMix);

        let a = first
            .deploy_unsigned(addr(0xbb), addr(0xcc), &[7u8; 32])
            .unwrap();
        let b = second
            .deploy_unsigned(addr(0xbb), addr(0xcc), &[7u8; 32])
            .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_scheme_changes_address() {
        let mut hash = factory(SaltScheme::HashMix);
        let mut xor = factory(SaltScheme::XorMix);

        let a = hash
            .deploy_unsigned(addr(0xbb), addr(0xcc), &[0u8; 32])
            .unwrap();
        let b = xor
            .deploy_unsigned(addr(0xbb), addr(0xcc), &[0u8; 32])
            .unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_signed_deploy_binds_to_controller() {
        let keypair = Keypair::generate();
        let proof = sign_approval(&keypair);

        let mut f = factory(SaltScheme::HashMix);
        let wallet = f.deploy_signed(addr(0xbb), &proof).unwrap();

        let expected =
            predict::controller_wallet_address(addr(0xaa), addr(0xbb), *keypair.address())
                .unwrap();
        assert_eq!(wallet, expected.address);
        assert_eq!(f.ledger().controller_of(&wallet), Some(*keypair.address()));
        assert_eq!(recover_controller(&proof).unwrap(), *keypair.address());
    }

    #[test]
    fn test_signed_deploy_submitter_independent() {
        let proof = sign_approval(&Keypair::generate());

        // Two submitters, modeled as two fresh instances of the same
        // factory, land on the same address. The signed path never touches
        // the unsigned scheme, so even that may differ between them.
        let mut first = factory(SaltScheme::HashMix);
        let mut second = factory(SaltScheme::XorMix);

        let a = first.deploy_signed(addr(0xbb), &proof).unwrap();
        let b = second.deploy_signed(addr(0xbb), &proof).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_signed_redeploy_collides_with_own_address() {
        let proof = sign_approval(&Keypair::generate());
        let mut f = factory(SaltScheme::HashMix);

        let wallet = f.deploy_signed(addr(0xbb), &proof).unwrap();
        let err = f.deploy_signed(addr(0xbb), &proof).unwrap_err();
        assert_eq!(err, FactoryError::AddressCollision(wallet));
    }

    #[test]
    fn test_invalid_proof_leaves_ledger_untouched() {
        let keypair = Keypair::generate();
        let mut proof = sign_approval(&keypair);
        proof[32] ^= 0x80;

        let mut f = factory(SaltScheme::HashMix);
        assert!(matches!(
            f.deploy_signed(addr(0xbb), &proof),
            Err(FactoryError::InvalidSignature(_))
        ));

        let untouched =
            predict::controller_wallet_address(addr(0xaa), addr(0xbb), *keypair.address())
                .unwrap();
        assert!(f.ledger().code_at(&untouched.address).is_none());
    }

    #[test]
    fn test_failed_initialization_rolls_back() {
        struct RejectingLedger(InMemoryLedger);

        impl Ledger for RejectingLedger {
            fn attempt_create(&mut self, address: Address, code: &[u8]) -> CreateOutcome {
                self.0.attempt_create(address, code)
            }
            fn initialize_wallet(&mut self, _: Address, _: Address) -> Result<(), String> {
                Err("no initializer".into())
            }
            fn revert_create(&mut self, address: Address) {
                self.0.revert_create(address);
            }
        }

        let mut f = Factory::new(
            addr(0xaa),
            SaltScheme::HashMix,
            RejectingLedger(InMemoryLedger::new()),
        );
        let err = f
            .deploy_unsigned(addr(0xbb), addr(0xcc), &[0u8; 32])
            .unwrap_err();
        assert!(matches!(err, FactoryError::Initialization(_)));

        let predicted = predict::unsigned_wallet_address(
            addr(0xaa),
            SaltScheme::HashMix,
            addr(0xbb),
            &[0u8; 32],
        )
        .unwrap();
        assert!(f.ledger().0.code_at(&predicted.address).is_none());
    }
}
