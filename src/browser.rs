// ============================================================================
// Ouverture d'URL dans le navigateur
// ============================================================================
// Lance l'ouvreur de la plateforme (xdg-open, open, start) sans bloquer
// l'interface. Le processus enfant est attendu dans un thread dédié pour
// ne pas laisser de zombie derrière chaque ouverture.
// ============================================================================

use std::io;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};

use tracing::debug;

/// Commande qui ouvre `url` avec l'ouvreur de la plateforme
pub fn opener_command(url: &str) -> Command {
    let (program, args): (&str, &[&str]) = if cfg!(target_os = "macos") {
        ("open", &[])
    } else if cfg!(target_os = "windows") {
        ("cmd", &["/C", "start", ""])
    } else {
        ("xdg-open", &[])
    };

    let mut command = Command::new(program);
    command.args(args).arg(url).stdout(Stdio::null()).stderr(Stdio::null());
    command
}

/// Ouvre `url` dans le navigateur
pub fn open(url: &str) -> io::Result<()> {
    let child = opener_command(url).spawn()?;
    reap(child);
    Ok(())
}

/// Attend la fin du processus dans un thread séparé
///
/// Retourne le handle du thread : Some(status) une fois le processus terminé.
pub fn reap(mut child: Child) -> JoinHandle<Option<ExitStatus>> {
    thread::spawn(move || {
        let status = child.wait().ok();
        debug!(?status, "URL opener exited");
        status
    })
}
