use moodscope_core::{Emotion, ProfileSnapshot, Sentiment, SentimentScore};

/// Minimal HTML escaping for scraped text dropped into markup.
pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// One comment paragraph, colored by its sentiment.
pub fn comment_html(text: &str, score: &SentimentScore) -> String {
    let color = match score.sentiment {
        Sentiment::Positive => "green",
        Sentiment::Negative => "red",
    };
    format!(
        r#"<p class="comment" style="color: {color};">{} (Sentiment: {}, Score: {:.2})</p>"#,
        escape(text),
        score.sentiment,
        score.score
    )
}

/// One post card: image, caption, predicted emotion, and its comments.
pub fn post_html(image_src: &str, caption: &str, emotion: Emotion, comments_html: &str) -> String {
    format!(
        r#"
        <div class="post">
            <div class="grid-item">
                <img src="{image_src}" alt="Post image">
                <p class="caption">{}</p>
                <h3>Predicted Emotion</h3>
                <p>{emotion}</p>
            </div>
            <div class="grid-item">
                <h3>Comments</h3>
                <div class="comments">{comments_html}</div>
            </div>
        </div>
        "#,
        escape(caption)
    )
}

/// Landing page: a single profile-URL form.
pub fn index_page() -> String {
    r#"<!DOCTYPE html>
<html>
<head>
    <style>
        body {
            background-image: url("/static/hero-bg.jpg");
            background-size: cover;
        }
        .center-form {
            position: absolute;
            top: 50%;
            left: 50%;
            transform: translate(-50%, -50%);
            width: 800px;
            height: 300px;
            background-color: rgba(255, 255, 255, 0);
        }
        .center-form input[type="text"] {
            width: 100%;
            padding: 12px 20px;
            margin: 8px 0;
            box-sizing: border-box;
            border-radius: 10px;
        }
        .center-form input[type="submit"] {
            width: 50%;
            background-color: #4CAF50;
            color: white;
            padding: 14px 20px;
            margin: 8px auto;
            border: none;
            border-radius: 10px;
            cursor: pointer;
            display: block;
        }
    </style>
</head>
<body>
    <form method="POST" class="center-form">
        <input type="text" name="profileUrl" placeholder="Enter Instagram profile URL" required>
        <input type="submit" value="Submit">
    </form>
</body>
</html>
"#
    .to_string()
}

/// Report page rendered from the last saved snapshot. The two post columns
/// are pre-rendered fragments and are embedded as-is.
pub fn display_page(snapshot: &ProfileSnapshot) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <style>
        .post {{
            width: 80%;
            margin: auto;
            padding: 20px;
            border: 1px solid #ccc;
            border-radius: 10px;
        }}
        .post img {{
            width: 250px;
            height: 250px;
        }}
        .comment {{
            margin: 5px 0;
            padding: 10px;
            border: 1px solid #ddd;
            border-radius: 5px;
        }}
        .grid-container {{
            display: grid;
            grid-template-columns: 1fr 1fr;
            gap: 10px;
            padding: 10px;
        }}
        .grid-item {{
            padding: 20px;
            border: 1px solid #ccc;
            border-radius: 10px;
        }}
        .logo {{
            display: block;
            margin: 0 auto;
            width: 200px;
        }}
        .heading {{
            font-size: 24px;
            margin-bottom: 10px;
        }}
        .username {{
            font-size: 20px;
        }}
        .count {{
            font-size: 18px;
            margin-bottom: 5px;
        }}
    </style>
</head>
<body>
    <img src="/static/logo2.jpg" class="logo" alt="Logo">
    <h1 class="heading">Profile Information</h1>
    <h2 class="heading">Username</h2>
    <h1 class="username">{username}</h1>
    <p class="count">Posts: {posts}</p>
    <p class="count">Followers: {followers}</p>
    <h2 class="heading">EXPECTED PSYCHOLOGICAL STATE</h2>
    <p class="count">{state}</p>
    <div class="grid-container">
        <div class="grid-item">{left}</div>
        <div class="grid-item">{right}</div>
    </div>
    <div class="grid-container">
        <div class="grid-item">
            <img src="/static/emotion_distribution.png" alt="Emotion Distribution">
        </div>
        <div class="grid-item">
            <img src="/static/sentiment_distribution.png" alt="Sentiment Distribution">
        </div>
    </div>
</body>
</html>
"#,
        username = escape(&snapshot.username),
        posts = snapshot.posts,
        followers = snapshot.follower_count,
        state = escape(&snapshot.psychological_state),
        left = snapshot.posts_html_left,
        right = snapshot.posts_html_right,
    )
}
