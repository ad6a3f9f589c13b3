use desktop_app_terminal::{Completion, LineKind, TerminalSession};
use desktop_vfs::VirtualFs;
use platform_host::VirtualFsService;
use pretty_assertions::assert_eq;

fn run(session: &mut TerminalSession, fs: &mut VirtualFs, line: &str) -> Vec<String> {
    session
        .run(fs, line)
        .lines
        .into_iter()
        .map(|line| line.text)
        .collect()
}

#[test]
fn ls_lists_seeded_home_directories_first() {
    let mut fs = VirtualFs::seeded();
    let mut session = TerminalSession::default();

    assert_eq!(
        run(&mut session, &mut fs, "ls"),
        [
            "d 2023-11-10 09:00          - documents/",
            "- 2023-10-05 11:15     150 KB image.png",
            "- 2023-11-11 14:30       1 KB readme.txt",
        ]
    );
    assert_eq!(
        run(&mut session, &mut fs, "ls documents"),
        ["(Directory is empty)"]
    );
    assert_eq!(
        run(&mut session, &mut fs, "ls nowhere"),
        ["ls: cannot access 'nowhere': No such file or directory"]
    );
}

#[test]
fn file_commands_mutate_the_shared_filesystem() {
    let mut fs = VirtualFs::seeded();
    let mut session = TerminalSession::default();

    assert!(run(&mut session, &mut fs, "mkdir projects").is_empty());
    assert!(run(&mut session, &mut fs, "cd projects").is_empty());
    assert_eq!(run(&mut session, &mut fs, "pwd"), ["/home/projects"]);
    assert!(run(&mut session, &mut fs, "touch notes.txt").is_empty());
    assert!(run(&mut session, &mut fs, "cp ../readme.txt copy.txt").is_empty());
    assert_eq!(
        run(&mut session, &mut fs, "cat copy.txt"),
        ["Welcome to the simulated OS!", "Edit this file content."]
    );
    assert!(run(&mut session, &mut fs, "mv notes.txt ..").is_empty());
    assert!(fs.exists("/home/notes.txt"));
    assert!(run(&mut session, &mut fs, "rm copy.txt").is_empty());
    assert!(run(&mut session, &mut fs, "cd ..").is_empty());
    assert_eq!(
        run(&mut session, &mut fs, "rm projects"),
        Vec::<String>::new()
    );
    assert!(!fs.exists("/home/projects"));
}

#[test]
fn filesystem_errors_render_as_error_lines() {
    let mut fs = VirtualFs::seeded();
    let mut session = TerminalSession::default();

    let output = session.run(&mut fs, "cd readme.txt");
    assert_eq!(output.lines.len(), 1);
    assert_eq!(output.lines[0].kind, LineKind::Error);
    assert_eq!(
        output.lines[0].text,
        "cd: 'readme.txt': Not a directory or not found"
    );

    assert_eq!(
        run(&mut session, &mut fs, "mkdir documents"),
        [fs
            .create_directory("documents")
            .expect_err("already exists")
            .message]
    );
}

#[test]
fn transcript_echoes_prompt_with_cwd_before_output() {
    let mut fs = VirtualFs::seeded();
    let mut session = TerminalSession::default();
    session.run(&mut fs, "cd /system");
    session.run(&mut fs, "echo done");

    let lines: Vec<_> = session
        .lines()
        .iter()
        .map(|line| (line.kind, line.text.as_str()))
        .collect();
    assert_eq!(
        lines[1..],
        [
            (LineKind::Prompt, "/home$ cd /system"),
            (LineKind::Prompt, "/system$ echo done"),
            (LineKind::Output, "done"),
        ]
    );
}

#[test]
fn history_navigation_recalls_deduplicated_commands() {
    let mut fs = VirtualFs::seeded();
    let mut session = TerminalSession::default();
    for line in ["pwd", "ls", "pwd"] {
        session.run(&mut fs, line);
    }
    assert_eq!(session.history().entries(), ["ls", "pwd"]);

    session.history_previous();
    assert_eq!(session.input(), "pwd");
    session.history_previous();
    assert_eq!(session.input(), "ls");
    session.history_previous();
    assert_eq!(session.input(), "ls");
    session.history_next();
    assert_eq!(session.input(), "pwd");
    session.history_next();
    assert_eq!(session.input(), "");
}

#[test]
fn tab_completes_commands_then_paths() {
    let mut fs = VirtualFs::seeded();
    let mut session = TerminalSession::default();

    session.set_input("mk");
    assert_eq!(
        session.complete(&fs),
        Completion::Completed("mkdir ".to_string())
    );

    session.set_input("cd doc");
    session.complete(&fs);
    assert_eq!(session.input(), "cd documents/");

    session.set_input("cat /home/re");
    session.complete(&fs);
    assert_eq!(session.input(), "cat /home/readme.txt ");

    session.set_input("cat missing");
    assert_eq!(session.complete(&fs), Completion::NoMatch);
    assert_eq!(session.input(), "cat missing");

    fs.create_file("readable.txt", None).expect("touch");
    session.set_input("cat rea");
    assert_eq!(
        session.complete(&fs),
        Completion::Completed("cat read".to_string())
    );
}

#[test]
fn second_tab_on_ambiguous_word_lists_candidates() {
    let fs = VirtualFs::seeded();
    let mut session = TerminalSession::default();

    session.set_input("c");
    assert_eq!(session.complete(&fs), Completion::Ambiguous);
    assert_eq!(
        session.complete(&fs),
        Completion::Listed(vec![
            "cat".to_string(),
            "cd".to_string(),
            "clear".to_string(),
            "cp".to_string(),
        ])
    );
    let tail: Vec<_> = session
        .lines()
        .iter()
        .rev()
        .take(2)
        .map(|line| line.text.as_str())
        .collect();
    assert_eq!(tail, ["/home$ c", "cat  cd  clear  cp"]);
    assert_eq!(session.input(), "c");
}

#[test]
fn apostrophes_pass_through_to_commands() {
    let mut fs = VirtualFs::seeded();
    let mut session = TerminalSession::default();

    assert_eq!(
        run(&mut session, &mut fs, "echo don't panic"),
        ["don't panic"]
    );
    assert!(run(&mut session, &mut fs, "mkdir it's").is_empty());
    assert!(fs.stat("/home/it's").expect("created").is_directory());
    assert!(run(&mut session, &mut fs, "touch back\\slash.txt").is_empty());
    assert!(fs.exists("/home/back\\slash.txt"));
}
