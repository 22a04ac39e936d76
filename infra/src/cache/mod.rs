//! Cache module - Redis client and the Redis-backed revocation store

pub mod redis_client;
pub mod revocation_cache;

pub use redis_client::RedisClient;
pub use revocation_cache::RedisRevocationRepository;
