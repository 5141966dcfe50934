// handlers/mod.rs - two security tiers
//
// Public (no auth) → Protected (bearer token resolved to a stored user).
// The router applies `jwt_auth_middleware` to every protected route.

pub mod protected; // Tier 2: /api/users/me, /api/properties/*, /api/alerts/*, /api/consents/*
pub mod public; // Tier 1: welcome, health, register, token
