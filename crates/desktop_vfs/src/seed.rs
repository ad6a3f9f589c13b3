//! First-boot filesystem contents.

use platform_host::FsNode;

/// Working directory of a freshly seeded desktop.
pub const SEED_CWD: &str = "/home";

const DOCUMENTS_MODIFIED_MS: u64 = 1_699_606_800_000;
const README_MODIFIED_MS: u64 = 1_699_713_000_000;
const IMAGE_MODIFIED_MS: u64 = 1_696_504_500_000;
const SYSTEM_MODIFIED_MS: u64 = 1_693_526_400_000;

/// Builds the default tree: `/home/{documents/, readme.txt, image.png}` and
/// `/system/config.sys`.
pub fn seed_tree() -> FsNode {
    let mut home = FsNode::directory(SYSTEM_MODIFIED_MS);
    if let Some(children) = home.children_mut() {
        children.insert(
            "documents".to_string(),
            FsNode::directory(DOCUMENTS_MODIFIED_MS),
        );
        children.insert(
            "readme.txt".to_string(),
            FsNode::file(
                "Welcome to the simulated OS!\nEdit this file content.",
                1024,
                README_MODIFIED_MS,
            ),
        );
        children.insert(
            "image.png".to_string(),
            FsNode::file("", 153_600, IMAGE_MODIFIED_MS),
        );
    }

    let mut system = FsNode::directory(SYSTEM_MODIFIED_MS);
    if let Some(children) = system.children_mut() {
        children.insert(
            "config.sys".to_string(),
            FsNode::file("CONFIG_DATA", 512, SYSTEM_MODIFIED_MS),
        );
    }

    let mut root = FsNode::directory(SYSTEM_MODIFIED_MS);
    if let Some(children) = root.children_mut() {
        children.insert("home".to_string(), home);
        children.insert("system".to_string(), system);
    }
    root
}
