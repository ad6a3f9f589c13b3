use desktop_app_contract::{AppCommand, AppHost, AppId, MemoryAppHost};
use desktop_app_explorer::{ClickModifier, DroppedFile, ExplorerModel, Notice};
use desktop_vfs::{ClipboardOperation, VirtualFs};
use platform_host::VirtualFsService;
use pretty_assertions::assert_eq;
use serde_json::json;

const WINDOW: u64 = 7;

fn setup() -> (MemoryAppHost, ExplorerModel) {
    let host = MemoryAppHost::with_fs(VirtualFs::seeded());
    let model = ExplorerModel::open(WINDOW, &host, false);
    (host, model)
}

fn names(model: &ExplorerModel) -> Vec<String> {
    model.visible().iter().map(|e| e.name.clone()).collect()
}

#[test]
fn opens_at_cwd_with_directories_first() {
    let (_, model) = setup();
    assert_eq!(model.current_path(), "/home");
    assert_eq!(names(&model), ["documents", "image.png", "readme.txt"]);
}

#[test]
fn hidden_files_and_search() {
    let (mut host, mut model) = setup();
    host.create_file("/home/.secrets", None).expect("touch");
    model.refresh(&host);
    assert_eq!(names(&model).len(), 3);

    model.set_show_hidden_files(true);
    assert_eq!(names(&model)[0], "documents");
    assert!(names(&model).contains(&".secrets".to_string()));

    model.set_search("READ");
    assert_eq!(names(&model), ["readme.txt"]);
}

#[test]
fn navigation_clears_selection_and_search() {
    let (host, mut model) = setup();
    model.click(0, ClickModifier::None);
    model.set_search("doc");
    model.navigate_to(&host, "documents").expect("enter");
    assert_eq!(model.current_path(), "/home/documents");
    assert!(model.selection().is_empty());
    assert_eq!(model.search(), "");

    model.navigate_up(&host).expect("up");
    model.navigate_up(&host).expect("up");
    assert_eq!(model.current_path(), "/");
    model.navigate_up(&host).expect("root stays");
    assert_eq!(model.current_path(), "/");

    assert_eq!(
        model.navigate_to(&host, "/home/readme.txt"),
        Err(Notice::error("Not a directory: /home/readme.txt"))
    );
}

#[test]
fn path_bar_sets_working_directory() {
    let (mut host, mut model) = setup();
    model.submit_path(&mut host, " ../system ").expect("cd");
    assert_eq!(model.current_path(), "/system");
    assert_eq!(host.cwd(), "/system");
    assert!(model.submit_path(&mut host, "/nowhere").is_err());
    assert_eq!(model.current_path(), "/system");
}

#[test]
fn create_and_rename_report_outcomes() {
    let (mut host, mut model) = setup();
    assert_eq!(
        model.create_folder(&mut host, "projects"),
        Notice::success("Folder 'projects' created.")
    );
    assert_eq!(
        model.create_file(&mut host, "todo.txt"),
        Notice::success("File 'todo.txt' created.")
    );
    assert!(model.create_folder(&mut host, "projects").is_error());
    assert!(model.create_file(&mut host, "  ").is_error());

    assert_eq!(
        model.rename(&mut host, "todo.txt", "done.txt"),
        Notice::success("Renamed to 'done.txt'.")
    );
    assert!(model.selection().contains("done.txt"));
    assert_eq!(
        names(&model),
        ["documents", "projects", "done.txt", "image.png", "readme.txt"]
    );
}

#[test]
fn batch_delete_keeps_selection_on_failure() {
    let (mut host, mut model) = setup();
    host.create_file("/home/documents/keep.txt", None).expect("touch");
    model.refresh(&host);

    model.click(1, ClickModifier::None);
    assert_eq!(
        model.delete_selected(&mut host),
        [Notice::success("'image.png' deleted.")]
    );

    model.click(0, ClickModifier::None);
    model.click(1, ClickModifier::Toggle);
    let notices = model.delete_selected(&mut host);
    assert_eq!(notices.len(), 2);
    assert_eq!(notices[0], Notice::success("'readme.txt' deleted."));
    assert!(notices[1].is_error());
    assert_eq!(model.selected_names(), ["documents"]);
    assert_eq!(names(&model), ["documents"]);
}

#[test]
fn drag_onto_folder_moves_items() {
    let (mut host, mut model) = setup();
    model.click(1, ClickModifier::None);
    model.click(2, ClickModifier::Range);
    assert_eq!(
        model.move_selected_into(&mut host, "documents"),
        [Notice::success("Moved 2 items into 'documents'.")]
    );
    assert!(model.selection().is_empty());
    assert!(host.exists("/home/documents/readme.txt"));

    let ignored = model.move_into_folder(&mut host, &["documents".to_string()], "documents");
    assert!(ignored.is_empty());
    let onto_file = model.move_into_folder(&mut host, &["documents".to_string()], "nope");
    assert!(onto_file.is_empty());
}

#[test]
fn sidebar_drop_reports_collisions() {
    let (mut host, mut model) = setup();
    host.create_file("/readme.txt", None).expect("touch");

    let notices = model.move_to_path(
        &mut host,
        &["readme.txt".to_string(), "image.png".to_string()],
        "/",
    );
    assert_eq!(notices[0], Notice::success("Moved 1 item into 'Root'."));
    assert!(notices[1].is_error());
    assert!(notices[1].message.starts_with("Failed to move 1 item. (mv: "));

    let same = model.move_to_path(&mut host, &["readme.txt".to_string()], "/home");
    assert!(same.is_empty());
}

#[test]
fn copy_paste_and_cut_paste_through_shared_clipboard() {
    let (mut host, mut model) = setup();
    assert_eq!(model.paste(&mut host), [Notice::error("Clipboard is empty.")]);
    assert_eq!(model.copy_selection(&mut host), None);

    model.click(2, ClickModifier::None);
    assert_eq!(
        model.copy_selection(&mut host),
        Some(Notice::success("1 item(s) copied to clipboard."))
    );
    assert_eq!(
        model.paste(&mut host),
        [Notice::success("Successfully copied 1 item(s).")]
    );
    assert!(host.exists("/home/readme (2).txt"));

    model.click(1, ClickModifier::None);
    assert_eq!(
        model.cut_selection(&mut host),
        Some(Notice::success("1 item(s) cut to clipboard."))
    );
    model.navigate_to(&host, "documents").expect("enter");
    assert_eq!(
        model.paste(&mut host),
        [Notice::success("Successfully moved 1 item(s).")]
    );
    assert_eq!(names(&model), ["image.png"]);
    assert!(host.clipboard().is_none());
}

#[test]
fn open_routes_files_to_apps() {
    let (mut host, mut model) = setup();
    model.open_item(&mut host, "readme.txt").expect("text");
    model.open_item(&mut host, "image.png").expect("image");
    assert_eq!(
        host.commands,
        [
            (
                WINDOW,
                AppCommand::OpenWindow {
                    app_id: AppId::TextEditor,
                    context: Some(json!({ "file_path": "/home/readme.txt" })),
                }
            ),
            (
                WINDOW,
                AppCommand::OpenWindow {
                    app_id: AppId::ImageViewer,
                    context: Some(json!({ "file_path": "/home/image.png" })),
                }
            ),
        ]
    );

    model.navigate_to(&host, "/system").expect("system");
    assert_eq!(
        model.open_item(&mut host, "config.sys"),
        Err(Notice::error("Cannot open this file type: config.sys"))
    );
    model.navigate_up(&host).expect("up");
    model.open_item(&mut host, "home").expect("dir");
    assert_eq!(model.current_path(), "/home");
}

#[test]
fn dropped_files_are_imported_into_current_folder() {
    let (mut host, mut model) = setup();
    let notices = model.import_files(
        &mut host,
        &[
            DroppedFile::new("pixel.gif", "image/gif", b"GIF89a".to_vec()),
            DroppedFile::new("notes.txt", "", b"remember".to_vec()),
            DroppedFile::new("blob.bin", "application/octet-stream", vec![1, 2, 3]),
            DroppedFile::new("documents", "text/plain", b"dup".to_vec()),
        ],
    );
    assert_eq!(notices.len(), 2);
    assert_eq!(
        notices[0],
        Notice::error("touch: cannot touch '/home/documents': Is a directory")
    );
    assert_eq!(notices[1], Notice::success("Successfully added 3 file(s)."));

    assert_eq!(
        host.read_file("pixel.gif").expect("image"),
        "data:image/gif;base64,R0lGODlh"
    );
    assert_eq!(host.read_file("notes.txt").expect("text"), "remember");
    assert_eq!(host.stat("blob.bin").expect("bin").size, Some(3));
    assert!(names(&model).contains(&"blob.bin".to_string()));
}

#[test]
fn clipboard_paths_are_absolute() {
    let (mut host, mut model) = setup();
    model.navigate_to(&host, "/").expect("root");
    model.click(0, ClickModifier::None);
    model.cut_selection(&mut host).expect("notice");
    let clipboard = host.clipboard().expect("clipboard");
    assert_eq!(clipboard.operation, ClipboardOperation::Cut);
    assert_eq!(clipboard.paths, ["/home"]);
}
