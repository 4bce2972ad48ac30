use dirs::home_dir;
use std::io;
use std::io::ErrorKind;
use std::path::PathBuf;

pub const ROSTER_HOME_ENV: &str = "ROSTER_HOME";

/// Directory holding `config.toml`. `ROSTER_HOME` wins when set and must
/// name an existing directory; otherwise `~/.roster`, which need not exist.
pub fn find_roster_home() -> io::Result<PathBuf> {
    let from_env = std::env::var(ROSTER_HOME_ENV)
        .ok()
        .filter(|val| !val.is_empty());
    resolve_roster_home(from_env.as_deref())
}

fn resolve_roster_home(from_env: Option<&str>) -> io::Result<PathBuf> {
    let Some(val) = from_env else {
        let mut home = home_dir()
            .ok_or_else(|| io::Error::new(ErrorKind::NotFound, "could not find home directory"))?;
        home.push(".roster");
        return Ok(home);
    };

    let path = PathBuf::from(val);
    match std::fs::metadata(&path) {
        Ok(meta) if meta.is_dir() => Ok(path),
        Ok(_) => Err(io::Error::new(
            ErrorKind::InvalidInput,
            format!("{ROSTER_HOME_ENV} points to {val:?}, which is not a directory"),
        )),
        Err(err) if err.kind() == ErrorKind::NotFound => Err(io::Error::new(
            ErrorKind::NotFound,
            format!("{ROSTER_HOME_ENV} points to {val:?}, which does not exist"),
        )),
        Err(err) => Err(io::Error::new(
            err.kind(),
            format!("failed to read {ROSTER_HOME_ENV} {val:?}: {err}"),
        )),
    }
}
