//! Game-server interface duplication.
//!
//! Several client interfaces are also exposed to dedicated servers under a
//! `GameServer` name. The copies share every declaration with the client
//! version, so they are synthesized from the parsed files instead of parsed.

use crate::config::ParserConfig;
use crate::model::{Interface, SourceFile};

/// Append a game-server copy of each configured file. Only interfaces are
/// copied. Returns the number of files added.
pub fn synthesize(files: &mut Vec<SourceFile>, config: &ParserConfig) -> usize {
    let clones: Vec<SourceFile> = files
        .iter()
        .filter(|f| config.gameserver_files.iter().any(|name| *name == f.name))
        .map(clone_for_gameserver)
        .collect();

    let added = clones.len();
    for clone in clones {
        tracing::debug!(file = %clone.name, interfaces = clone.interfaces.len(), "synthesized game server file");
        files.push(clone);
    }
    added
}

fn clone_for_gameserver(file: &SourceFile) -> SourceFile {
    let mut clone = SourceFile::new(file.name.replacen("isteam", "isteamgameserver", 1));
    clone.interfaces = file
        .interfaces
        .iter()
        .map(|interface| Interface {
            name: interface.name.replacen("ISteam", "ISteamGameServer", 1),
            ..interface.clone()
        })
        .collect();
    clone
}
