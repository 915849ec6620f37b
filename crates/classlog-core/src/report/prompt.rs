//! Prompt construction for the two report call shapes.

use indoc::formatdoc;

use crate::session::SessionSnapshot;

/// Prompt for polishing a single qualitative note.
pub fn polish_prompt(note: &str) -> String {
    formatdoc! {"
        Rewrite the following classroom observation note into clear,
        professional prose. Keep the meaning intact, fix grammar and
        phrasing, and do not add observations that are not in the note.
        Reply with the rewritten note only.

        Note:
        {note}
    "}
}

/// Prompt for the full narrative report, with the serialized snapshot
/// embedded.
pub fn report_prompt(snapshot: &SessionSnapshot) -> String {
    formatdoc! {"
        You are an instructional coach. Write a narrative report in
        Markdown from the classroom observation record below. Cover how
        teaching time was distributed across modes, notable patterns in
        the recorded actions, and the engagement trajectory, then close
        with two or three constructive suggestions for the teacher.

        Observation record:
        {record}
    ", record = snapshot.to_plain_text()}
}
