//! Listing, detail and post form pages.

use std::fmt::Write as _;

use pagination::Page;

use crate::domain::{Group, GroupListing, Post, PostDetail, PostForm, PostId, ProfileListing, User};

use super::{error_list, escape, escape_multiline, field_errors, layout};

const DATE_FORMAT: &str = "%d %b %Y %H:%M";

/// Which links a post card carries besides the author and detail links.
#[derive(Clone, Copy)]
struct CardOptions {
    show_group: bool,
}

fn post_card(post: &Post, options: CardOptions) -> String {
    let username = escape(post.author().username().as_str());
    let image = post
        .image()
        .map(|path| {
            format!(
                r#"<img class="post-image" src="/media/{}" alt="">"#,
                escape(path.as_str())
            )
        })
        .unwrap_or_default();
    let group = match post.group() {
        Some(group) if options.show_group => format!(
            r#"<a class="post-group" href="/group/{slug}/">#{title}</a>"#,
            slug = escape(group.slug().as_str()),
            title = escape(group.title()),
        ),
        _ => String::new(),
    };
    format!(
        r#"<article class="post" id="post-{id}">
<p class="post-meta">Author: <a href="/profile/{username}/">{username}</a>, {date}</p>
{image}<p class="post-text">{text}</p>
<a href="/posts/{id}/">Details</a> {group}
</article>
"#,
        id = post.id(),
        date = post.pub_date().format(DATE_FORMAT),
        text = escape_multiline(post.text()),
    )
}

fn post_list(page: &Page<Post>, options: CardOptions) -> String {
    if page.items().is_empty() {
        return "<p class=\"empty\">No posts yet.</p>\n".to_owned();
    }
    page.items()
        .iter()
        .map(|post| post_card(post, options))
        .collect::<Vec<_>>()
        .join("<hr>\n")
}

/// Page links for `base_path`, or nothing when everything fits on one page.
fn paginator(page: &Page<Post>, base_path: &str) -> String {
    if !page.has_other_pages() {
        return String::new();
    }
    let mut nav = String::from(r#"<nav class="pagination">"#);
    if let Some(previous) = page.previous_page_number() {
        let _ = write!(
            nav,
            r#"<a href="{base_path}?page=1">First</a> <a href="{base_path}?page={previous}">Previous</a> "#
        );
    }
    let _ = write!(
        nav,
        r#"<span class="current">Page {} of {}</span>"#,
        page.number(),
        page.num_pages()
    );
    if let Some(next) = page.next_page_number() {
        let _ = write!(
            nav,
            r#" <a href="{base_path}?page={next}">Next</a> <a href="{base_path}?page={last}">Last</a>"#,
            last = page.num_pages()
        );
    }
    nav.push_str("</nav>\n");
    nav
}

/// `GET /`: every post, newest first.
pub fn index_page(page: &Page<Post>, viewer: Option<&User>) -> String {
    let content = format!(
        "<h1>Latest updates</h1>\n{posts}{paginator}",
        posts = post_list(page, CardOptions { show_group: true }),
        paginator = paginator(page, "/"),
    );
    layout("Latest updates", viewer, &content)
}

/// `GET /group/{slug}/`.
pub fn group_page(listing: &GroupListing, viewer: Option<&User>) -> String {
    let group = &listing.group;
    let base_path = format!("/group/{}/", escape(group.slug().as_str()));
    let content = format!(
        "<h1>{title}</h1>\n<p class=\"group-description\">{description}</p>\n{posts}{paginator}",
        title = escape(group.title()),
        description = escape_multiline(group.description()),
        posts = post_list(&listing.posts, CardOptions { show_group: false }),
        paginator = paginator(&listing.posts, &base_path),
    );
    layout(group.title(), viewer, &content)
}

fn follow_button(listing: &ProfileListing, viewer: Option<&User>) -> String {
    let author = &listing.author;
    match viewer {
        Some(viewer) if viewer.id() != author.id() => {
            let username = escape(author.username().as_str());
            if listing.following {
                format!(r#"<a class="unfollow" href="/profile/{username}/unfollow/">Unfollow</a>"#)
            } else {
                format!(r#"<a class="follow" href="/profile/{username}/follow/">Follow</a>"#)
            }
        }
        _ => String::new(),
    }
}

/// `GET /profile/{username}/`.
pub fn profile_page(listing: &ProfileListing, viewer: Option<&User>) -> String {
    let username = listing.author.username().as_str();
    let base_path = format!("/profile/{}/", escape(username));
    let content = format!(
        "<h1>All posts by {name}</h1>\n<p class=\"post-count\">Posts: {count}</p>\n{button}\n{posts}{paginator}",
        name = escape(username),
        count = listing.post_count(),
        button = follow_button(listing, viewer),
        posts = post_list(&listing.posts, CardOptions { show_group: true }),
        paginator = paginator(&listing.posts, &base_path),
    );
    layout(&format!("Profile of {username}"), viewer, &content)
}

/// `GET /posts/{id}/`: the post, its comments, and a comment box for
/// signed-in viewers.
pub fn post_detail_page(detail: &PostDetail, viewer: Option<&User>) -> String {
    let post = &detail.post;
    let author = escape(post.author().username().as_str());
    let group = post
        .group()
        .map(|group| {
            format!(
                r#"<p class="post-group">Group: <a href="/group/{slug}/">{title}</a></p>"#,
                slug = escape(group.slug().as_str()),
                title = escape(group.title()),
            )
        })
        .unwrap_or_default();
    let image = post
        .image()
        .map(|path| {
            format!(
                r#"<img class="post-image" src="/media/{}" alt="">"#,
                escape(path.as_str())
            )
        })
        .unwrap_or_default();
    let edit_link = match viewer {
        Some(viewer) if post.is_authored_by(viewer.id()) => {
            format!(r#"<a class="edit" href="/posts/{}/edit/">Edit post</a>"#, post.id())
        }
        _ => String::new(),
    };

    let mut comments = String::new();
    for comment in &detail.comments {
        let _ = write!(
            comments,
            r#"<div class="comment"><p class="comment-meta"><a href="/profile/{name}/">{name}</a>, {date}</p><p>{text}</p></div>
"#,
            name = escape(comment.author().username().as_str()),
            date = comment.created().format(DATE_FORMAT),
            text = escape_multiline(comment.text()),
        );
    }
    let comment_form = if viewer.is_some() {
        format!(
            r#"<form method="post" action="/posts/{id}/comment/">
<label for="id_text">Add a comment</label>
<textarea name="text" id="id_text" required></textarea>
<button type="submit">Send</button>
</form>
"#,
            id = post.id()
        )
    } else {
        String::new()
    };

    let content = format!(
        r#"<article class="post-detail" id="post-{id}">
<aside>
<p class="post-date">{date}</p>
{group}<p class="post-author">Author: <a href="/profile/{author}/">{author}</a></p>
<p class="post-count">Posts by this author: {count}</p>
</aside>
{image}<p class="post-text">{text}</p>
{edit_link}
</article>
<section class="comments">
{comments}{comment_form}</section>
"#,
        id = post.id(),
        date = post.pub_date().format(DATE_FORMAT),
        count = detail.author_post_count,
        text = escape_multiline(post.text()),
    );
    layout(&format!("Post {}", post.excerpt()), viewer, &content)
}

/// `GET /follow/`: posts by authors the viewer follows.
pub fn follow_page(page: &Page<Post>, viewer: &User) -> String {
    let content = format!(
        "<h1>Posts by authors you follow</h1>\n{posts}{paginator}",
        posts = post_list(page, CardOptions { show_group: true }),
        paginator = paginator(page, "/follow/"),
    );
    layout("Following", Some(viewer), &content)
}

/// Create or edit form. `editing` names the post being edited.
pub fn post_form_page(
    form: &PostForm,
    groups: &[Group],
    editing: Option<PostId>,
    viewer: &User,
) -> String {
    let (title, action, submit) = match editing {
        Some(id) => ("Edit post", format!("/posts/{id}/edit/"), "Save"),
        None => ("New post", "/create/".to_owned(), "Publish"),
    };
    let mut options = String::from(r#"<option value="">---------</option>"#);
    for group in groups {
        let selected = if form.group == Some(group.id()) {
            " selected"
        } else {
            ""
        };
        let _ = write!(
            options,
            r#"<option value="{id}"{selected}>{title}</option>"#,
            id = group.id(),
            title = escape(group.title()),
        );
    }
    let content = format!(
        r#"<h1>{title}</h1>
{non_field}<form method="post" action="{action}" enctype="multipart/form-data">
<label for="id_text">Text</label>
{text_errors}<textarea name="text" id="id_text" required>{text}</textarea>
<label for="id_group">Group</label>
{group_errors}<select name="group" id="id_group">{options}</select>
<label for="id_image">Image</label>
{image_errors}<input type="file" name="image" id="id_image" accept="image/*">
<button type="submit">{submit}</button>
</form>
"#,
        non_field = error_list(form.errors.non_field()),
        text_errors = field_errors(&form.errors, "text"),
        text = escape(&form.text),
        group_errors = field_errors(&form.errors, "group"),
        image_errors = field_errors(&form.errors, "image"),
    );
    layout(title, Some(viewer), &content)
}
