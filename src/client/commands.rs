//! Command vocabulary understood by Redis-compatible servers

/// Known server commands, lowercase, in registration order
pub const COMMANDS: &[&str] = &[
    "append", "auth", "bgrewriteaof", "bgsave", "bitcount", "bitfield", "bitop", "bitpos",
    "blpop", "brpop", "brpoplpush", "blmove", "bzpopmin", "bzpopmax", "client", "cluster",
    "command", "config", "copy", "dbsize", "debug", "decr", "decrby", "del", "discard",
    "dump", "echo", "eval", "evalsha", "exec", "exists", "expire", "expireat",
    "expiretime", "failover", "flushall", "flushdb", "geoadd", "geodist", "geohash",
    "geopos", "georadius", "georadiusbymember", "geosearch", "geosearchstore", "get",
    "getbit", "getdel", "getex", "getrange", "getset", "hdel", "hello", "hexists", "hget",
    "hgetall", "hincrby", "hincrbyfloat", "hkeys", "hlen", "hmget", "hmset", "hrandfield",
    "hscan", "hset", "hsetnx", "hstrlen", "hvals", "incr", "incrby", "incrbyfloat", "info",
    "keys", "lastsave", "latency", "lindex", "linsert", "llen", "lmove", "lpop", "lpos",
    "lpush", "lpushx", "lrange", "lrem", "lset", "ltrim", "memory", "mget", "migrate",
    "module", "monitor", "move", "mset", "msetnx", "multi", "object", "persist", "pexpire",
    "pexpireat", "pexpiretime", "pfadd", "pfcount", "pfmerge", "ping", "psetex",
    "psubscribe", "pttl", "publish", "pubsub", "punsubscribe", "quit", "randomkey",
    "readonly", "readwrite", "rename", "renamenx", "replicaof", "reset", "restore", "role",
    "rpop", "rpoplpush", "rpush", "rpushx", "sadd", "save", "scan", "scard", "script",
    "sdiff", "sdiffstore", "select", "set", "setbit", "setex", "setnx", "setrange",
    "shutdown", "sinter", "sintercard", "sinterstore", "sismember", "slaveof", "slowlog",
    "smembers", "smismember", "smove", "sort", "spop", "srandmember", "srem", "sscan",
    "strlen", "subscribe", "substr", "sunion", "sunionstore", "swapdb", "sync", "time",
    "touch", "ttl", "type", "unlink", "unsubscribe", "unwatch", "wait", "watch", "xack",
    "xadd", "xautoclaim", "xclaim", "xdel", "xgroup", "xinfo", "xlen", "xpending",
    "xrange", "xread", "xreadgroup", "xrevrange", "xtrim", "zadd", "zcard", "zcount",
    "zdiff", "zdiffstore", "zincrby", "zinter", "zinterstore", "zlexcount", "zmscore",
    "zpopmax", "zpopmin", "zrandmember", "zrange", "zrangebylex", "zrangebyscore",
    "zrangestore", "zrank", "zrem", "zremrangebylex", "zremrangebyrank",
    "zremrangebyscore", "zrevrange", "zrevrangebylex", "zrevrangebyscore", "zrevrank",
    "zscan", "zscore", "zunion", "zunionstore",
];

/// The vocabulary as owned strings
pub fn vocabulary() -> Vec<String> {
    COMMANDS.iter().map(|c| c.to_string()).collect()
}
