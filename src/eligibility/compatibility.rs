use super::domain::BloodType;
use BloodType::*;

const O_NEG_DONORS: &[BloodType] = &[ONegative];
const O_POS_DONORS: &[BloodType] = &[ONegative, OPositive];
const A_NEG_DONORS: &[BloodType] = &[ONegative, ANegative];
const A_POS_DONORS: &[BloodType] = &[ONegative, OPositive, ANegative, APositive];
const B_NEG_DONORS: &[BloodType] = &[ONegative, BNegative];
const B_POS_DONORS: &[BloodType] = &[ONegative, OPositive, BNegative, BPositive];
const AB_NEG_DONORS: &[BloodType] = &[ONegative, ANegative, BNegative, ABNegative];
const AB_POS_DONORS: &[BloodType] = &BloodType::ALL;

impl BloodType {
    /// Donor types this recipient can safely receive from, in a fixed order.
    pub const fn compatible_donors(self) -> &'static [BloodType] {
        match self {
            ONegative => O_NEG_DONORS,
            OPositive => O_POS_DONORS,
            ANegative => A_NEG_DONORS,
            APositive => A_POS_DONORS,
            BNegative => B_NEG_DONORS,
            BPositive => B_POS_DONORS,
            ABNegative => AB_NEG_DONORS,
            ABPositive => AB_POS_DONORS,
        }
    }

    pub fn can_receive_from(self, donor: BloodType) -> bool {
        self.compatible_donors().contains(&donor)
    }

    /// Recipient types a donation of this type can go to.
    pub fn compatible_recipients(self) -> Vec<BloodType> {
        BloodType::ALL
            .into_iter()
            .filter(|recipient| recipient.can_receive_from(self))
            .collect()
    }
}

/// String-keyed lookup used at the store/HTTP boundary. Only the exact eight labels match,
/// the same keys `check_availability` reads from the store.
pub fn compatible_donors(recipient: &str) -> &'static [BloodType] {
    BloodType::ALL
        .into_iter()
        .find(|blood_type| blood_type.label() == recipient)
        .map(BloodType::compatible_donors)
        .unwrap_or(&[])
}
