use crate::models::{Post, PostType};

const AUTHOR: &str = "Thắng Phạm";

fn post(
    id: &str,
    title: &str,
    excerpt: &str,
    content: &str,
    category: &str,
    views: i64,
    date: &str,
    image_url: &str,
    post_type: PostType,
) -> Post {
    Post {
        id: id.to_string(),
        title: title.to_string(),
        content: content.to_string(),
        excerpt: excerpt.to_string(),
        author: AUTHOR.to_string(),
        category: category.to_string(),
        views,
        date: date.to_string(),
        image_url: image_url.to_string(),
        post_type,
    }
}

/// The list served whenever the managed table cannot be reached or is empty.
pub fn fallback_posts() -> Vec<Post> {
    vec![
        post(
            "1",
            "Mua Tim Tiktok NHANH CHÓNG, CHẤT LƯỢNG tại AppTangLike",
            "Bạn đã từng đăng một video TikTok đầy tâm huyết nhưng chỉ nhận được vài lượt tim lác đác, hãy khám phá bí mật này ngay hôm nay để video của bạn lên xu hướng...",
            "Full content here...",
            "My Blog",
            5,
            "11/05/2025",
            "https://picsum.photos/seed/tiktok-post/800/450",
            PostType::Blog,
        ),
        post(
            "2",
            "Cafe với Anh Thắng nghe kể chuyện hành trình fonttiengviet.com",
            "",
            "",
            "My Blog",
            4245,
            "24/08/2023",
            "https://picsum.photos/seed/cafe-post/400/300",
            PostType::Blog,
        ),
        post(
            "3",
            "Giới thiệu thiết kế web Quảng Nam Web - quangnamweb.com",
            "",
            "",
            "My Blog",
            8753,
            "02/08/2023",
            "https://picsum.photos/seed/web-post/400/300",
            PostType::Blog,
        ),
        post(
            "4",
            "Hướng dẫn viết widget bài viết theo chuyên mục trong wordpress",
            "",
            "",
            "WordPress",
            14034,
            "05/06/2023",
            "https://picsum.photos/seed/wp-widget/400/300",
            PostType::Blog,
        ),
        post(
            "s1",
            "Share mẫu website blog cá nhân cực nhẹ, giống hocwordpress.vn",
            "",
            "",
            "Share code",
            21654,
            "15/05/2023",
            "https://picsum.photos/seed/sc1/400/300",
            PostType::ShareCode,
        ),
        post(
            "s2",
            "Share plugin toolset types phiên bản mới nhất cập nhật thường xuyên",
            "",
            "",
            "Share code",
            16015,
            "30/07/2019",
            "https://picsum.photos/seed/sc2/400/300",
            PostType::ShareCode,
        ),
        post(
            "s3",
            "Share plugin iThemes Security Pro phiên bản mới nhất cập nhật thường xuyên",
            "",
            "",
            "Share code",
            11004,
            "25/07/2019",
            "https://picsum.photos/seed/sc3/400/300",
            PostType::ShareCode,
        ),
        post(
            "s4",
            "Share theme Flatsome phiên bản mới nhất cập nhật thường xuyên",
            "",
            "",
            "Share code",
            18561,
            "22/07/2019",
            "https://picsum.photos/seed/sc4/400/300",
            PostType::ShareCode,
        ),
        post(
            "s5",
            "Share plugin Elementor PRO cập nhật thường xuyên",
            "",
            "",
            "Share code",
            17360,
            "13/07/2019",
            "https://picsum.photos/seed/sc5/400/300",
            PostType::ShareCode,
        ),
        post(
            "s6",
            "Share plugin WP Rocket cập nhật thường xuyên cho anh em blog",
            "",
            "",
            "Share code",
            11772,
            "11/07/2019",
            "https://picsum.photos/seed/sc6/400/300",
            PostType::ShareCode,
        ),
    ]
}
