//! Page element tree
//!
//! A minimal model of the page: every element has an optional id and a
//! parent link. The overlay manager only needs two things from it: find
//! an element by id, and decide whether a click target lies inside a
//! given element.

/// Well-known element ids of the playground page
pub mod ids {
    pub const BODY: &str = "body";
    pub const SOURCE: &str = "source";
    pub const RESULT: &str = "result";
    pub const FILENAME_LABEL: &str = "filenameLabel";
    pub const ROW: &str = "row";

    pub const RUN_BUTTON: &str = "runButton";
    pub const WINDOW_BUTTON: &str = "windowButton";
    pub const NEW_BUTTON: &str = "newButton";
    pub const LOAD_BUTTON: &str = "loadButton";
    pub const SAVE_BUTTON: &str = "saveButton";
    pub const EXAMPLES_MENU: &str = "examplesMenu";

    /// "Discard unsaved changes?" confirmation
    pub const DISCARD_CONFIRM: &str = "overwriteConfirm";
    pub const DISCARD_CONFIRM_YES: &str = "overwriteConfirmYes";
    pub const DISCARD_CONFIRM_NO: &str = "overwriteConfirmNo";

    /// "A script with this name exists, overwrite?" confirmation
    pub const OVERWRITE_FILE_CONFIRM: &str = "overwriteFileConfirm";
    pub const OVERWRITE_FILE_YES: &str = "overwriteFileYes";
    pub const OVERWRITE_FILE_NO: &str = "overwriteFileNo";

    pub const LOAD_DIALOG: &str = "loadDialog";
    pub const LOAD_LIST: &str = "loadList";
    pub const SAVE_DIALOG: &str = "saveDialog";
    pub const SAVE_LIST: &str = "saveList";
    pub const SAVE_FILENAME: &str = "saveDialogFilename";
    pub const SAVE_CONFIRM: &str = "saveDialogSave";

    pub const DELETE_ERROR: &str = "deleteError";
    pub const SAVE_ERROR: &str = "saveError";
    pub const NETWORK_ERROR: &str = "networkError";
}

/// Index of an element in its tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementId(usize);

#[derive(Debug, Clone)]
struct Node {
    id: Option<String>,
    parent: Option<ElementId>,
}

/// Elements with parent links; index 0 is the document root
#[derive(Debug, Clone)]
pub struct ElementTree {
    nodes: Vec<Node>,
}

impl ElementTree {
    /// A tree containing only the document root
    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                id: None,
                parent: None,
            }],
        }
    }

    pub fn root(&self) -> ElementId {
        ElementId(0)
    }

    /// Add an element under `parent`
    pub fn add(&mut self, parent: ElementId, id: Option<&str>) -> ElementId {
        self.nodes.push(Node {
            id: id.map(str::to_string),
            parent: Some(parent),
        });
        ElementId(self.nodes.len() - 1)
    }

    /// Add an element with an id under the element with id `parent_id`.
    /// Returns None if the parent does not exist.
    pub fn add_under(&mut self, parent_id: &str, id: &str) -> Option<ElementId> {
        let parent = self.find(parent_id)?;
        Some(self.add(parent, Some(id)))
    }

    /// First element with the given id
    pub fn find(&self, id: &str) -> Option<ElementId> {
        self.nodes
            .iter()
            .position(|n| n.id.as_deref() == Some(id))
            .map(ElementId)
    }

    pub fn id_of(&self, element: ElementId) -> Option<&str> {
        self.nodes.get(element.0).and_then(|n| n.id.as_deref())
    }

    pub fn parent(&self, element: ElementId) -> Option<ElementId> {
        self.nodes.get(element.0).and_then(|n| n.parent)
    }

    /// True if `target` is `container` or one of its descendants.
    /// Walks parent links until a match is found or the root is passed.
    pub fn is_within(&self, target: ElementId, container: ElementId) -> bool {
        let mut current = Some(target);
        while let Some(element) = current {
            if element == container {
                return true;
            }
            current = self.parent(element);
        }
        false
    }

    /// The full playground page: editor, toolbar and all overlays
    pub fn playground_page() -> Self {
        let mut tree = Self::new();
        let root = tree.root();
        let body = tree.add(root, Some(ids::BODY));

        for id in [
            ids::SOURCE,
            ids::RESULT,
            ids::FILENAME_LABEL,
            ids::ROW,
            ids::RUN_BUTTON,
            ids::WINDOW_BUTTON,
            ids::NEW_BUTTON,
            ids::LOAD_BUTTON,
            ids::SAVE_BUTTON,
            ids::EXAMPLES_MENU,
        ] {
            tree.add(body, Some(id));
        }

        let overlays: [(&str, &[&str]); 7] = [
            (
                ids::DISCARD_CONFIRM,
                &[ids::DISCARD_CONFIRM_YES, ids::DISCARD_CONFIRM_NO],
            ),
            (
                ids::OVERWRITE_FILE_CONFIRM,
                &[ids::OVERWRITE_FILE_YES, ids::OVERWRITE_FILE_NO],
            ),
            (ids::LOAD_DIALOG, &[ids::LOAD_LIST]),
            (
                ids::SAVE_DIALOG,
                &[ids::SAVE_LIST, ids::SAVE_FILENAME, ids::SAVE_CONFIRM],
            ),
            (ids::DELETE_ERROR, &[]),
            (ids::SAVE_ERROR, &[]),
            (ids::NETWORK_ERROR, &[]),
        ];
        for (overlay, children) in overlays {
            let element = tree.add(body, Some(overlay));
            for child in children {
                tree.add(element, Some(child));
            }
        }

        tree
    }
}

impl Default for ElementTree {
    fn default() -> Self {
        Self::new()
    }
}
