//! Local identity: view and spend key pairs plus the current ephemeral record.
//!
//! The ephemeral record is the only mutable state in the protocol. It is held
//! behind a mutex inside the identity, and every write returns the record it
//! replaced so callers can tell whether another writer got there first.

use parking_lot::Mutex;
use tracing::debug;

use dksap_core::error::{DksapError, Result};
use dksap_core::types::{
    Address, Channel, EphemeralRecord, HashScheme, KeyPair, MetaAddress, PrivateScalar,
    PublicPoint, SenderId,
};
use dksap_crypto::encode_address;

use crate::blinded::{derive_blinded_secret, recover_blinded_secret, BlindedSecret};
use crate::channel::{establish_channel, establish_channel_mirror};
use crate::one_time::{recover_one_time_key, recover_one_time_private};
use crate::sender_id::derive_sender_id;

/// A participant holding both private scalars.
pub struct Identity {
    view: KeyPair,
    spend: KeyPair,
    ephemeral: Mutex<Option<EphemeralRecord>>,
}

impl Identity {
    /// Generates a fresh identity with no ephemeral record.
    pub fn generate() -> Self {
        Self {
            view: KeyPair::generate(),
            spend: KeyPair::generate(),
            ephemeral: Mutex::new(None),
        }
    }

    /// Builds an identity from existing key pairs.
    ///
    /// # Errors
    /// Returns `InvalidScalar` if either pair lacks its private scalar.
    pub fn new(view: KeyPair, spend: KeyPair) -> Result<Self> {
        view.require_private()?;
        spend.require_private()?;
        Ok(Self {
            view,
            spend,
            ephemeral: Mutex::new(None),
        })
    }

    /// Attaches a previously persisted ephemeral record.
    pub fn with_ephemeral(self, record: EphemeralRecord) -> Self {
        *self.ephemeral.lock() = Some(record);
        self
    }

    /// The view key pair `(a, A)`.
    pub fn view(&self) -> &KeyPair {
        &self.view
    }

    /// The spend key pair `(b, B)`.
    pub fn spend(&self) -> &KeyPair {
        &self.spend
    }

    /// The public points senders need.
    pub fn meta_address(&self) -> MetaAddress {
        MetaAddress::from_key_pairs(&self.view, &self.spend)
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // EPHEMERAL RECORD
    // ═══════════════════════════════════════════════════════════════════════════

    /// Returns a copy of the current ephemeral record.
    pub fn ephemeral(&self) -> Option<EphemeralRecord> {
        self.ephemeral.lock().clone()
    }

    /// Replaces the ephemeral record, returning the previous one.
    pub fn store_ephemeral(&self, record: EphemeralRecord) -> Option<EphemeralRecord> {
        debug!(ephemeral = %record.public().to_hex(), "storing ephemeral record");
        self.ephemeral.lock().replace(record)
    }

    /// Replaces the ephemeral record only if the current one has public point
    /// `expected` (`None` meaning no record).
    ///
    /// On success returns the previous record. On conflict hands `record`
    /// back unchanged.
    pub fn compare_and_store_ephemeral(
        &self,
        expected: Option<&PublicPoint>,
        record: EphemeralRecord,
    ) -> std::result::Result<Option<EphemeralRecord>, EphemeralRecord> {
        let mut guard = self.ephemeral.lock();
        let current = guard.as_ref().map(|r| r.public());
        if current != expected {
            debug!("ephemeral record changed concurrently, not replacing");
            return Err(record);
        }
        Ok(guard.replace(record))
    }

    /// Draws and stores a new ephemeral record.
    ///
    /// Returns the new record and the one it replaced.
    pub fn generate_ephemeral(&self) -> (EphemeralRecord, Option<EphemeralRecord>) {
        let record = EphemeralRecord::generate();
        let previous = self.store_ephemeral(record.clone());
        (record, previous)
    }

    /// Removes and returns the ephemeral record.
    pub fn take_ephemeral(&self) -> Option<EphemeralRecord> {
        self.ephemeral.lock().take()
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // DERIVATIONS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Channel with a counterpart's spend point, computed as `a * B`.
    pub fn establish_channel(&self, counterpart_spend: &PublicPoint) -> Result<Channel> {
        establish_channel(&self.view, counterpart_spend)
    }

    /// Channel with a counterpart's view point, computed as `b * A`.
    pub fn establish_channel_mirror(&self, counterpart_view: &PublicPoint) -> Result<Channel> {
        establish_channel_mirror(&self.spend, counterpart_view)
    }

    /// Derives a blinded secret with this identity's spend scalar and stores
    /// the fresh `(r, R)` as the new ephemeral record.
    ///
    /// Returns the derivation and the record it replaced. Nothing is stored
    /// if the derivation fails.
    pub fn derive_blinded_secret(
        &self,
        channel: &Channel,
        counterpart_view: &PublicPoint,
        counterpart_ephemeral: &PublicPoint,
    ) -> Result<(BlindedSecret, Option<EphemeralRecord>)> {
        let blinded = derive_blinded_secret(
            channel,
            self.spend.require_private()?,
            counterpart_view,
            counterpart_ephemeral,
        )?;
        let previous = self.store_ephemeral(blinded.ephemeral().clone());
        Ok((blinded, previous))
    }

    /// Recomputes a blinded secret another identity derived against this one.
    ///
    /// Uses the stored ephemeral record as `r'`, so it must still be the
    /// record the counterpart saw when deriving.
    ///
    /// # Errors
    /// Returns `InvalidScalar` if no ephemeral record is stored.
    pub fn recover_blinded_secret(
        &self,
        ephemeral: &PublicPoint,
        counterpart_view: &PublicPoint,
        counterpart_spend: &PublicPoint,
    ) -> Result<PublicPoint> {
        let record = self
            .ephemeral()
            .ok_or_else(|| DksapError::InvalidScalar("no ephemeral record stored".into()))?;
        recover_blinded_secret(
            ephemeral,
            counterpart_view,
            counterpart_spend,
            self.view.require_private()?,
            self.spend.require_private()?,
            record.scalar(),
        )
    }

    /// Recomputes the one-time key addressed to this identity for `R`.
    pub fn recover_one_time_key(
        &self,
        ephemeral: &PublicPoint,
        scheme: HashScheme,
    ) -> Result<PublicPoint> {
        recover_one_time_key(ephemeral, self.view.require_private()?, self.spend.public(), scheme)
    }

    /// Recovers the private scalar of the one-time key for `R`.
    pub fn recover_one_time_private(
        &self,
        ephemeral: &PublicPoint,
        scheme: HashScheme,
    ) -> Result<PrivateScalar> {
        recover_one_time_private(
            ephemeral,
            self.view.require_private()?,
            self.spend.require_private()?,
            scheme,
        )
    }

    /// Sender identifier of this identity's spend point.
    pub fn sender_id(&self, timestamp: &str, scheme: HashScheme) -> SenderId {
        derive_sender_id(self.spend.public(), timestamp, scheme)
    }

    /// Address of this identity's spend point.
    pub fn address(&self, scheme: HashScheme) -> Address {
        encode_address(self.spend.public(), scheme)
    }
}

impl std::fmt::Debug for Identity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Identity")
            .field("view", &self.view)
            .field("spend", &self.spend)
            .field("ephemeral", &self.ephemeral.lock().as_ref().map(|r| *r.public()))
            .finish()
    }
}
