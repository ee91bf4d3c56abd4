use std::collections::HashMap;

use crate::connection::ClientHandle;
use crate::server::Engine;

use super::{
    blpop, echo, get, llen, lpop, lrange, ping, rpush_and_lpush, set, type_command, xadd, xrange,
    xread, CommandError,
};

/// What the reactor does with a dispatched command.
#[derive(Debug, PartialEq, Eq)]
pub enum DispatchResult {
    /// Send these bytes to the issuing client.
    Reply(Vec<u8>),
    /// Send nothing: the client is parked and its reply will be written by
    /// a wake-up or by the deadline sweep, exactly once.
    Deferred,
}

#[derive(Debug, Clone, Copy)]
enum CommandKind {
    Ping,
    Echo,
    Set,
    Get,
    Type,
    Rpush,
    Lpush,
    Lrange,
    Llen,
    Lpop,
    Blpop,
    Xadd,
    Xrange,
    Xread,
}

/// Routes parsed requests to their handlers.
///
/// The lookup table is built once at construction; command words match
/// case-insensitively. Handlers never write to sockets themselves except
/// through the engine's client registry, and errors never escape: every
/// failure becomes its RESP error line.
pub struct CommandDispatcher {
    table: HashMap<&'static str, CommandKind>,
}

impl CommandDispatcher {
    pub fn new() -> Self {
        let table = HashMap::from([
            ("PING", CommandKind::Ping),
            ("ECHO", CommandKind::Echo),
            ("SET", CommandKind::Set),
            ("GET", CommandKind::Get),
            ("TYPE", CommandKind::Type),
            ("RPUSH", CommandKind::Rpush),
            ("LPUSH", CommandKind::Lpush),
            ("LRANGE", CommandKind::Lrange),
            ("LLEN", CommandKind::Llen),
            ("LPOP", CommandKind::Lpop),
            ("BLPOP", CommandKind::Blpop),
            ("XADD", CommandKind::Xadd),
            ("XRANGE", CommandKind::Xrange),
            ("XREAD", CommandKind::Xread),
        ]);

        CommandDispatcher { table }
    }

    /// Executes one command against the engine on behalf of `client`.
    pub fn dispatch(
        &self,
        engine: &mut Engine,
        client: ClientHandle,
        args: &[&[u8]],
    ) -> DispatchResult {
        match self.route(engine, client, args) {
            Ok(result) => result,
            Err(error) => DispatchResult::Reply(error.as_bytes()),
        }
    }

    fn route(
        &self,
        engine: &mut Engine,
        client: ClientHandle,
        args: &[&[u8]],
    ) -> Result<DispatchResult, CommandError> {
        if args.is_empty() {
            return Err(CommandError::EmptyCommand);
        }

        let name = args[0].to_ascii_uppercase();
        let kind = std::str::from_utf8(&name)
            .ok()
            .and_then(|name| self.table.get(name))
            .ok_or(CommandError::UnknownCommand)?;

        let reply = match kind {
            CommandKind::Ping => ping::ping(args)?,
            CommandKind::Echo => echo::echo(args)?,
            CommandKind::Set => set::set(&mut engine.store, args)?,
            CommandKind::Get => get::get(&mut engine.store, args)?,
            CommandKind::Type => type_command::type_command(&mut engine.store, args)?,
            CommandKind::Rpush => rpush_and_lpush::rpush(engine, args)?,
            CommandKind::Lpush => rpush_and_lpush::lpush(engine, args)?,
            CommandKind::Lrange => lrange::lrange(&mut engine.store, args)?,
            CommandKind::Llen => llen::llen(&mut engine.store, args)?,
            CommandKind::Lpop => lpop::lpop(&mut engine.store, args)?,
            CommandKind::Blpop => return blpop::blpop(engine, client, args),
            CommandKind::Xadd => xadd::xadd(engine, args)?,
            CommandKind::Xrange => xrange::xrange(&mut engine.store, args)?,
            CommandKind::Xread => return xread::xread(engine, client, args),
        };

        Ok(DispatchResult::Reply(reply))
    }
}

impl Default for CommandDispatcher {
    fn default() -> Self {
        CommandDispatcher::new()
    }
}
