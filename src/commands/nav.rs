use crate::error::FsError;
use crate::vfs::{absolute_path, Vfs};

pub fn cd(vfs: &Vfs, cwd: &mut Vec<String>, args: &[&str]) -> String {
    let target = args.first().copied().unwrap_or("");
    match vfs.cd(cwd, target) {
        Ok(path) => {
            *cwd = path;
            String::new()
        }
        Err(FsError::NotADirectory) => format!("cd: not a directory: {}", target),
        Err(_) => format!("cd: no such file or directory: {}", target),
    }
}

pub fn ls(vfs: &Vfs, cwd: &[String], args: &[&str]) -> String {
    let target = args.first().copied().unwrap_or(".");
    match vfs.resolve(cwd, target) {
        Ok((_, node)) if node.is_dir() => Vfs::list(node).join("  "),
        Ok((path, _)) => path.last().cloned().unwrap_or_default(),
        Err(_) => format!("ls: cannot access '{}': No such file or directory", target),
    }
}

pub fn pwd(cwd: &[String]) -> String {
    absolute_path(cwd)
}
