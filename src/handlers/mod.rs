// handlers/mod.rs - Two security tiers
//
// Public (no auth): token issuance and liveness checks
// Protected (bearer JWT): asset CRUD under /api/asset(s)
pub mod protected;
pub mod public;
